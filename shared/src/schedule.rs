//! Weekly slot grid shared by every booking flow.
//!
//! The grid is a fixed 6 x 8 space: six weekday columns ([`Day`]) by eight
//! 90-minute rows ([`HourBlock`]). Rooms publish an [`AvailabilityMatrix`] over
//! that space, and booking forms hold at most one [`SlotSelection`] inside a
//! [`WeeklySlotGrid`].
//!
//! Labels are the wire format: the remote API receives `reserved_day` and
//! `reserved_hour_block` verbatim as the canonical strings below, so matching
//! is exact (case and accent sensitive).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of day columns in the grid
pub const DAY_COUNT: usize = 6;
/// Number of hour-block rows in the grid
pub const HOUR_BLOCK_COUNT: usize = 8;

/// Canonical day labels, in display order
pub const DAY_LABELS: [&str; DAY_COUNT] = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado"];

/// Canonical hour-block labels, in display order
pub const HOUR_BLOCK_LABELS: [&str; HOUR_BLOCK_COUNT] = [
    "7:00-8:30",
    "8:30-10:00",
    "10:00-11:30",
    "11:30-13:00",
    "13:00-14:30",
    "14:30-16:00",
    "16:00-17:30",
    "17:30-19:00",
];

/// A bookable weekday (column of the grid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Lunes,
    Martes,
    #[serde(rename = "Miércoles")]
    Miercoles,
    Jueves,
    Viernes,
    #[serde(rename = "Sábado")]
    Sabado,
}

impl Day {
    pub const ALL: [Day; DAY_COUNT] = [
        Day::Lunes,
        Day::Martes,
        Day::Miercoles,
        Day::Jueves,
        Day::Viernes,
        Day::Sabado,
    ];

    /// Column index of this day
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        DAY_LABELS[self.index()]
    }

    pub fn from_index(index: usize) -> Option<Day> {
        Self::ALL.get(index).copied()
    }

    /// Exact lookup against the canonical labels
    pub fn from_label(label: &str) -> Option<Day> {
        DAY_LABELS
            .iter()
            .position(|candidate| *candidate == label)
            .and_then(Self::from_index)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Day {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::from_label(s).ok_or_else(|| ScheduleError::invalid_day(s))
    }
}

/// A 90-minute block between 7:00 and 19:00 (row of the grid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HourBlock {
    #[serde(rename = "7:00-8:30")]
    Block0700,
    #[serde(rename = "8:30-10:00")]
    Block0830,
    #[serde(rename = "10:00-11:30")]
    Block1000,
    #[serde(rename = "11:30-13:00")]
    Block1130,
    #[serde(rename = "13:00-14:30")]
    Block1300,
    #[serde(rename = "14:30-16:00")]
    Block1430,
    #[serde(rename = "16:00-17:30")]
    Block1600,
    #[serde(rename = "17:30-19:00")]
    Block1730,
}

impl HourBlock {
    pub const ALL: [HourBlock; HOUR_BLOCK_COUNT] = [
        HourBlock::Block0700,
        HourBlock::Block0830,
        HourBlock::Block1000,
        HourBlock::Block1130,
        HourBlock::Block1300,
        HourBlock::Block1430,
        HourBlock::Block1600,
        HourBlock::Block1730,
    ];

    /// Row index of this block
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        HOUR_BLOCK_LABELS[self.index()]
    }

    pub fn from_index(index: usize) -> Option<HourBlock> {
        Self::ALL.get(index).copied()
    }

    /// Exact lookup against the canonical labels
    pub fn from_label(label: &str) -> Option<HourBlock> {
        HOUR_BLOCK_LABELS
            .iter()
            .position(|candidate| *candidate == label)
            .and_then(Self::from_index)
    }
}

impl fmt::Display for HourBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HourBlock {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HourBlock::from_label(s).ok_or_else(|| ScheduleError::invalid_hour_block(s))
    }
}

/// Errors raised while selecting a slot
///
/// None of these are fatal: the grid keeps its previous selection and the
/// caller shows the message, which lists the allowed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid day '{given}'. Allowed values: {}", allowed.join(", "))]
    InvalidDay { given: String, allowed: Vec<&'static str> },

    #[error("Invalid hour block '{given}'. Allowed values: {}", allowed.join(", "))]
    InvalidHourBlock { given: String, allowed: Vec<&'static str> },

    /// Only produced by the availability-gated selection
    #[error("Slot {day} {hour} is already occupied")]
    SlotOccupied { day: Day, hour: HourBlock },
}

impl ScheduleError {
    fn invalid_day(given: &str) -> Self {
        ScheduleError::InvalidDay {
            given: given.to_string(),
            allowed: DAY_LABELS.to_vec(),
        }
    }

    fn invalid_hour_block(given: &str) -> Self {
        ScheduleError::InvalidHourBlock {
            given: given.to_string(),
            allowed: HOUR_BLOCK_LABELS.to_vec(),
        }
    }
}

/// Raised when a wire matrix is not 8 rows by 6 columns
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("availability matrix must be {expected_rows}x{expected_cols}, got {rows} rows (row lengths: {row_lengths:?})")]
pub struct MatrixShapeError {
    pub rows: usize,
    pub row_lengths: Vec<usize>,
    pub expected_rows: usize,
    pub expected_cols: usize,
}

/// Occupancy codes per (hour block, day); 0 is free, anything else occupied.
///
/// On the wire this is a plain `number[][]`; decoding rejects any other shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<i64>>")]
pub struct AvailabilityMatrix {
    cells: [[i64; DAY_COUNT]; HOUR_BLOCK_COUNT],
}

impl AvailabilityMatrix {
    pub fn new(cells: [[i64; DAY_COUNT]; HOUR_BLOCK_COUNT]) -> Self {
        Self { cells }
    }

    /// Matrix with every slot free, used for newly created rooms
    pub fn all_free() -> Self {
        Self::new([[0; DAY_COUNT]; HOUR_BLOCK_COUNT])
    }

    /// Raw availability query by position.
    ///
    /// # Panics
    ///
    /// Panics if `hour_index >= 8` or `day_index >= 6`. Callers drive both
    /// indices from the canonical label lists, so this is a programming error.
    pub fn is_available_at(&self, hour_index: usize, day_index: usize) -> bool {
        assert!(
            hour_index < HOUR_BLOCK_COUNT && day_index < DAY_COUNT,
            "slot index out of range: hour {hour_index}, day {day_index}"
        );
        self.cells[hour_index][day_index] == 0
    }

    pub fn is_available(&self, hour: HourBlock, day: Day) -> bool {
        self.is_available_at(hour.index(), day.index())
    }

    pub fn occupancy(&self, hour: HourBlock, day: Day) -> i64 {
        self.cells[hour.index()][day.index()]
    }

    pub fn rows(&self) -> &[[i64; DAY_COUNT]; HOUR_BLOCK_COUNT] {
        &self.cells
    }

    /// Number of free slots in the whole week
    pub fn free_slot_count(&self) -> usize {
        self.cells.iter().flatten().filter(|code| **code == 0).count()
    }
}

impl Default for AvailabilityMatrix {
    fn default() -> Self {
        Self::all_free()
    }
}

impl TryFrom<Vec<Vec<i64>>> for AvailabilityMatrix {
    type Error = MatrixShapeError;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        let shape_error = |rows: &Vec<Vec<i64>>| MatrixShapeError {
            rows: rows.len(),
            row_lengths: rows.iter().map(Vec::len).collect(),
            expected_rows: HOUR_BLOCK_COUNT,
            expected_cols: DAY_COUNT,
        };

        if rows.len() != HOUR_BLOCK_COUNT || rows.iter().any(|row| row.len() != DAY_COUNT) {
            return Err(shape_error(&rows));
        }

        let mut cells = [[0; DAY_COUNT]; HOUR_BLOCK_COUNT];
        for (target, row) in cells.iter_mut().zip(rows) {
            target.copy_from_slice(&row);
        }
        Ok(Self { cells })
    }
}

impl From<AvailabilityMatrix> for Vec<Vec<i64>> {
    fn from(matrix: AvailabilityMatrix) -> Self {
        matrix.cells.iter().map(|row| row.to_vec()).collect()
    }
}

/// The single slot a user has chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotSelection {
    pub day: Day,
    pub hour: HourBlock,
}

impl SlotSelection {
    pub fn new(day: Day, hour: HourBlock) -> Self {
        Self { day, hour }
    }

    pub fn matches(&self, day: Day, hour: HourBlock) -> bool {
        self.day == day && self.hour == hour
    }

    /// `(day, hour)` labels as sent in `reserved_day` / `reserved_hour_block`
    pub fn labels(&self) -> (&'static str, &'static str) {
        (self.day.label(), self.hour.label())
    }
}

impl fmt::Display for SlotSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.hour)
    }
}

/// Validate a `(day, hour)` pair of labels. The day check always runs first.
pub fn parse_slot(day: &str, hour: &str) -> Result<SlotSelection, ScheduleError> {
    let day = day.parse::<Day>()?;
    let hour = hour.parse::<HourBlock>()?;
    Ok(SlotSelection::new(day, hour))
}

/// Highlight check used by renderers; an empty selection matches nothing.
pub fn is_selected(day: Day, hour: HourBlock, selection: Option<&SlotSelection>) -> bool {
    selection.is_some_and(|current| current.matches(day, hour))
}

/// Holds the current slot selection of one booking form.
///
/// Two states: empty, or holding exactly one `(day, hour)`. A successful
/// selection replaces the previous one; a failed selection leaves it alone.
/// Only [`WeeklySlotGrid::reset`] empties it again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySlotGrid {
    selection: Option<SlotSelection>,
}

impl WeeklySlotGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validated selection that never consults availability
    pub fn select_slot(&mut self, day: &str, hour: &str) -> Result<SlotSelection, ScheduleError> {
        let selection = parse_slot(day, hour)?;
        self.selection = Some(selection);
        Ok(selection)
    }

    /// Same validation as [`select_slot`](Self::select_slot), then rejects
    /// slots whose matrix cell is occupied.
    pub fn select_available_slot(
        &mut self,
        matrix: &AvailabilityMatrix,
        day: &str,
        hour: &str,
    ) -> Result<SlotSelection, ScheduleError> {
        let selection = parse_slot(day, hour)?;
        if !matrix.is_available(selection.hour, selection.day) {
            return Err(ScheduleError::SlotOccupied {
                day: selection.day,
                hour: selection.hour,
            });
        }
        self.selection = Some(selection);
        Ok(selection)
    }

    pub fn selection(&self) -> Option<&SlotSelection> {
        self.selection.as_ref()
    }

    pub fn is_selected(&self, day: Day, hour: HourBlock) -> bool {
        is_selected(day, hour, self.selection.as_ref())
    }

    /// Called when the enclosing form is submitted or reset
    pub fn reset(&mut self) {
        self.selection = None;
    }
}
