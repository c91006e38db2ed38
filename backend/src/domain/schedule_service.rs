//! Schedule view domain logic.
//!
//! Turns an [`AvailabilityMatrix`] and/or a [`WeeklySlotGrid`] selection into a
//! [`ScheduleView`] that any renderer can draw cell by cell. Renderers never
//! look at the matrix or the selection themselves.
//!
//! Two views exist:
//!
//! - **Availability**: what a room publishes, free or occupied per slot.
//! - **Selection**: the booking grid. The chosen slot is highlighted; other
//!   cells reflect the room's matrix when there is one and are all available
//!   when there is none (element reservations are not tied to a room).

use shared::{
    AvailabilityMatrix, CellState, Day, HourBlock, Room, ScheduleCell, ScheduleRow, ScheduleView,
    SlotSelection, WeeklySlotGrid,
};
use tracing::debug;

pub const AVAILABILITY_TITLE: &str = "Disponibilidad";
pub const SELECTION_TITLE: &str = "Selecciona tu horario";
/// Header of the hour-label column
pub const HOUR_COLUMN_HEADER: &str = "Hora";

/// Builds renderer-ready schedule grids
#[derive(Clone, Default)]
pub struct ScheduleService;

impl ScheduleService {
    pub fn new() -> Self {
        Self
    }

    /// Availability grid of a room as published by the service
    pub fn room_availability(&self, room: &Room) -> ScheduleView {
        debug!(
            "Building availability view for room {} ({} free slots)",
            room.id,
            room.availability.free_slot_count()
        );
        self.build_view(AVAILABILITY_TITLE, |day, hour| {
            if room.availability.is_available(hour, day) {
                CellState::Available
            } else {
                CellState::Occupied
            }
        })
    }

    /// Booking grid highlighting the current selection
    pub fn selection_view(&self, grid: &WeeklySlotGrid, matrix: Option<&AvailabilityMatrix>) -> ScheduleView {
        let selection = grid.selection().copied();
        self.build_view(SELECTION_TITLE, |day, hour| Self::selection_state(selection, matrix, day, hour))
    }

    fn selection_state(
        selection: Option<SlotSelection>,
        matrix: Option<&AvailabilityMatrix>,
        day: Day,
        hour: HourBlock,
    ) -> CellState {
        if shared::is_selected(day, hour, selection.as_ref()) {
            return CellState::Selected;
        }
        match matrix {
            Some(matrix) if !matrix.is_available(hour, day) => CellState::Occupied,
            _ => CellState::Available,
        }
    }

    fn build_view<F>(&self, title: &str, state_of: F) -> ScheduleView
    where
        F: Fn(Day, HourBlock) -> CellState,
    {
        let rows = HourBlock::ALL
            .iter()
            .map(|&hour| ScheduleRow {
                hour,
                cells: Day::ALL
                    .iter()
                    .map(|&day| {
                        let state = state_of(day, hour);
                        ScheduleCell {
                            day,
                            hour,
                            state,
                            marker: state.marker().to_string(),
                        }
                    })
                    .collect(),
            })
            .collect();

        ScheduleView {
            title: title.to_string(),
            days: Day::ALL.to_vec(),
            rows,
        }
    }

    /// Plain-text table of a view, one line per hour block
    pub fn render_text(&self, view: &ScheduleView) -> String {
        let hour_width = HourBlock::ALL
            .iter()
            .map(|hour| hour.label().chars().count())
            .max()
            .unwrap_or(0)
            .max(HOUR_COLUMN_HEADER.len());
        let day_width = view
            .days
            .iter()
            .map(|day| day.label().chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        out.push_str(&view.title);
        out.push('\n');

        out.push_str(&pad(HOUR_COLUMN_HEADER, hour_width));
        for day in &view.days {
            out.push_str(" | ");
            out.push_str(&pad(day.label(), day_width));
        }
        out.push('\n');

        for row in &view.rows {
            out.push_str(&pad(row.hour.label(), hour_width));
            for cell in &row.cells {
                out.push_str(" | ");
                out.push_str(&pad(&cell.marker, day_width));
            }
            out.push('\n');
        }
        out
    }
}

/// Left-align to `width` characters (not bytes; labels carry accents)
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut padded = text.to_string();
    padded.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    padded
}
