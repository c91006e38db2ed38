use serde::{Deserialize, Serialize};
use std::fmt;

pub mod schedule;

pub use schedule::{
    is_selected, parse_slot, AvailabilityMatrix, Day, HourBlock, MatrixShapeError, ScheduleError,
    SlotSelection, WeeklySlotGrid, DAY_COUNT, DAY_LABELS, HOUR_BLOCK_COUNT, HOUR_BLOCK_LABELS,
};

/// A bookable room as served by `/room/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub location: String,
    pub capacity: u32,
    #[serde(default)]
    pub description: String,
    /// Occupancy per (hour block, day); rejected on decode unless 8x6
    pub availability: AvailabilityMatrix,
}

/// Payload for creating a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoom {
    pub location: String,
    pub capacity: u32,
    pub description: String,
    pub availability: AvailabilityMatrix,
    pub state: String,
}

/// Catalog entry for a recreational element as served by `/recreative-elements/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecreativeElement {
    /// Element ID
    pub element: i64,
    /// Display name
    pub label: String,
    /// Units available for lending
    pub quantity: u32,
}

/// Payload for creating a recreational element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecreativeElement {
    pub name: String,
    pub quantity: u32,
}

/// A registered user, looked up by identification document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub identification: String,
}

/// Lifecycle state of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationState {
    Activa,
    Cancelada,
    Finalizada,
    /// Any state string this client does not know about
    #[serde(other)]
    Unknown,
}

impl ReservationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationState::Activa => "activa",
            ReservationState::Cancelada => "cancelada",
            ReservationState::Finalizada => "finalizada",
            ReservationState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ReservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element details embedded in a reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDetails {
    pub id: i64,
    pub name: String,
}

/// An element lent out as part of a reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowedElement {
    pub element: i64,
    pub amount: u32,
    pub element_details: ElementDetails,
}

/// A reservation as returned by `/reservation/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub location: String,
    pub state: ReservationState,
    /// Canonical day label, see [`Day`]
    pub reserved_day: String,
    /// Canonical hour-block label, see [`HourBlock`]
    pub reserved_hour_block: String,
    pub user: i64,
    /// Absent for element-only reservations
    #[serde(default)]
    pub room: Option<i64>,
    #[serde(default)]
    pub borrowed_elements: Vec<BorrowedElement>,
}

impl Reservation {
    /// The booked slot, if the stored labels are canonical
    pub fn slot(&self) -> Option<SlotSelection> {
        parse_slot(&self.reserved_day, &self.reserved_hour_block).ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == ReservationState::Cancelada
    }
}

/// One `{element_id, amount}` entry of a reservation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowedElementRequest {
    pub element_id: i64,
    pub amount: u32,
}

/// Payload for `POST /reservation/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub room: Option<i64>,
    pub reserved_day: String,
    pub reserved_hour_block: String,
    pub user: i64,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ReservationState>,
    pub borrowed_elements: Vec<BorrowedElementRequest>,
}

impl CreateReservationRequest {
    /// Request skeleton carrying the selection labels verbatim
    pub fn for_slot(slot: &SlotSelection, user: i64, location: impl Into<String>) -> Self {
        let (day, hour) = slot.labels();
        Self {
            room: None,
            reserved_day: day.to_string(),
            reserved_hour_block: hour.to_string(),
            user,
            location: location.into(),
            state: None,
            borrowed_elements: Vec::new(),
        }
    }
}

/// Payload for `PATCH /reservation/{id}/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReservationStateRequest {
    pub state: ReservationState,
}

/// Condition recorded for elements handed back in good shape
pub const RETURNED_GOOD: &str = "RETURNED_GOOD";

/// One line of a return register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnedElement {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "estado")]
    pub condition: String,
    #[serde(rename = "cantidad")]
    pub amount: u32,
}

impl ReturnedElement {
    /// Register line for a borrowed element, assumed returned in good shape
    pub fn from_borrowed(borrowed: &BorrowedElement) -> Self {
        let name = borrowed.element_details.name.trim();
        Self {
            code: borrowed.element.to_string(),
            name: if name.is_empty() { "Desconocido".to_string() } else { name.to_string() },
            condition: RETURNED_GOOD.to_string(),
            amount: borrowed.amount.max(1),
        }
    }
}

/// A return register as served by `/register/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Register {
    #[serde(default)]
    pub register_id: Option<i64>,
    #[serde(default)]
    pub reservation_id: Option<i64>,
    #[serde(default)]
    pub returned_elements: Vec<ReturnedElement>,
}

impl Register {
    /// Returned elements as listed in the register table, `N/A` when empty
    pub fn summary(&self) -> String {
        if self.returned_elements.is_empty() {
            return "N/A".to_string();
        }
        self.returned_elements
            .iter()
            .map(|element| format!("{} ({})", element.name, element.amount))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Payload for `POST /register/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRegisterRequest {
    pub reservation_id: i64,
    pub returned_elements: Vec<ReturnedElement>,
}

/// Rendering state of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Selected,
    Available,
    Occupied,
}

impl CellState {
    /// Marker drawn inside the cell
    pub fn marker(&self) -> &'static str {
        match self {
            CellState::Selected => "✓",
            CellState::Available => "",
            CellState::Occupied => "✗",
        }
    }

    /// Whether clicking the cell should be offered
    pub fn is_clickable(&self) -> bool {
        !matches!(self, CellState::Occupied)
    }
}

/// A single cell of a schedule view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleCell {
    pub day: Day,
    pub hour: HourBlock,
    pub state: CellState,
    pub marker: String,
}

/// One hour-block row of a schedule view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub hour: HourBlock,
    pub cells: Vec<ScheduleCell>,
}

/// Renderer-ready weekly grid: one header per day, one row per hour block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleView {
    pub title: String,
    pub days: Vec<Day>,
    pub rows: Vec<ScheduleRow>,
}

impl ScheduleView {
    pub fn cell(&self, day: Day, hour: HourBlock) -> Option<&ScheduleCell> {
        self.rows
            .get(hour.index())
            .and_then(|row| row.cells.get(day.index()))
    }
}
