//! Room booking form.
//!
//! Holds everything the "reserve a room" flow collects before posting a
//! reservation: the user (resolved from an identification), the room, and one
//! slot of the weekly grid. The UI forwards events here and renders the
//! state back; validation and request assembly never happen in the UI.
//!
//! Slot selection follows the configured [`SelectionPolicy`]: by default only
//! the labels are validated; with the gated policy an occupied cell of the
//! selected room is rejected as well.

use std::sync::Arc;

use shared::{CreateReservationRequest, Reservation, Room, ScheduleView, SlotSelection, WeeklySlotGrid};
use tracing::{error, info, warn};

use super::booking::{BookingError, UserLookup};
use super::schedule_service::ScheduleService;
use crate::config::SelectionPolicy;
use crate::io::ReservationApi;

pub struct RoomBookingForm {
    api: Arc<dyn ReservationApi>,
    policy: SelectionPolicy,
    user: UserLookup,
    room: Option<Room>,
    grid: WeeklySlotGrid,
    error_message: Option<String>,
}

impl RoomBookingForm {
    pub fn new(api: Arc<dyn ReservationApi>, policy: SelectionPolicy) -> Self {
        Self {
            api,
            policy,
            user: UserLookup::new(),
            room: None,
            grid: WeeklySlotGrid::new(),
            error_message: None,
        }
    }

    pub fn set_identification(&mut self, identification: impl Into<String>) {
        self.user.set_identification(identification);
        self.error_message = None;
    }

    pub async fn lookup_user(&mut self) -> Result<i64, BookingError> {
        self.error_message = None;
        match self.user.resolve(self.api.as_ref()).await {
            Ok(user) => Ok(user.id),
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn select_room(&mut self, room: Room) {
        info!("Room {} selected for booking", room.id);
        self.room = Some(room);
    }

    /// Apply a grid click; on failure the previous slot stays selected
    pub fn select_slot(&mut self, day: &str, hour: &str) -> Result<SlotSelection, BookingError> {
        let result = match (self.policy, self.room.as_ref()) {
            (SelectionPolicy::AvailabilityGated, Some(room)) => {
                self.grid.select_available_slot(&room.availability, day, hour)
            }
            _ => self.grid.select_slot(day, hour),
        };

        match result {
            Ok(selection) => {
                self.error_message = None;
                Ok(selection)
            }
            Err(e) => {
                warn!("Rejected slot selection {} {}: {}", day, hour, e);
                Err(self.fail(e.into()))
            }
        }
    }

    pub fn selection(&self) -> Option<&SlotSelection> {
        self.grid.selection()
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.user_id()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Submit is offered once a slot and a room are chosen
    pub fn can_submit(&self) -> bool {
        self.grid.selection().is_some() && self.room.is_some()
    }

    /// Selected room as shown in the read-only summary field
    pub fn room_summary(&self) -> String {
        self.room
            .as_ref()
            .map(|room| room.location.clone())
            .unwrap_or_else(|| "Ninguna".to_string())
    }

    /// Selected slot as shown in the read-only summary field
    pub fn slot_summary(&self) -> String {
        self.grid
            .selection()
            .map(|selection| selection.to_string())
            .unwrap_or_else(|| "Ninguno".to_string())
    }

    /// Booking grid, greying out slots the selected room reports as occupied
    pub fn schedule_view(&self, schedule: &ScheduleService) -> ScheduleView {
        schedule.selection_view(&self.grid, self.room.as_ref().map(|room| &room.availability))
    }

    pub fn build_request(&self) -> Result<CreateReservationRequest, BookingError> {
        let (selection, room) = match (self.grid.selection(), self.room.as_ref()) {
            (Some(selection), Some(room)) => (selection, room),
            _ => return Err(BookingError::MissingSlotOrRoom),
        };
        let user_id = self.user.user_id().ok_or(BookingError::MissingUser)?;

        let mut request = CreateReservationRequest::for_slot(selection, user_id, room.location.clone());
        request.room = Some(room.id);
        Ok(request)
    }

    /// Post the reservation; a successful submit resets the form.
    /// Dropping the future before it resolves leaves the form untouched.
    pub async fn submit(&mut self) -> Result<Reservation, BookingError> {
        self.error_message = None;

        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => return Err(self.fail(e)),
        };

        info!(
            "Creating room reservation: room={:?} slot={} {} user={}",
            request.room, request.reserved_day, request.reserved_hour_block, request.user
        );
        match self.api.create_reservation(&request).await {
            Ok(reservation) => {
                info!("Room reservation {} created", reservation.id);
                self.reset();
                Ok(reservation)
            }
            Err(e) => {
                error!("Error creating room reservation: {}", e);
                Err(self.fail(e.into()))
            }
        }
    }

    /// Back to an empty form
    pub fn reset(&mut self) {
        self.user.clear();
        self.room = None;
        self.grid.reset();
        self.error_message = None;
    }

    fn fail(&mut self, error: BookingError) -> BookingError {
        self.error_message = Some(error.user_message());
        error
    }
}
