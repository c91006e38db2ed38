//! Recreational element booking form.
//!
//! Lends catalog elements (balls, tables, ...) for one slot of the weekly
//! grid. There is no room, so the grid has no matrix and every cell is
//! selectable; only the labels are validated.

use std::sync::Arc;

use shared::{
    BorrowedElementRequest, CreateReservationRequest, RecreativeElement, Reservation,
    ReservationState, ScheduleView, SlotSelection, WeeklySlotGrid,
};
use tracing::{debug, error, info, warn};

use super::booking::{BookingError, UserLookup};
use super::schedule_service::ScheduleService;
use crate::io::ReservationApi;

/// An element picked in the form, with the amount requested
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedElement {
    pub element_id: i64,
    pub label: String,
    pub amount: u32,
    /// Units the catalog reports; 0 when unknown
    pub available: u32,
}

impl SelectedElement {
    fn clamp_amount(&self, amount: u32) -> u32 {
        let amount = amount.max(1);
        if self.available > 0 {
            amount.min(self.available)
        } else {
            amount
        }
    }
}

pub struct ElementBookingForm {
    api: Arc<dyn ReservationApi>,
    user: UserLookup,
    location: String,
    elements: Vec<SelectedElement>,
    grid: WeeklySlotGrid,
    error_message: Option<String>,
}

impl ElementBookingForm {
    pub fn new(api: Arc<dyn ReservationApi>) -> Self {
        Self {
            api,
            user: UserLookup::new(),
            location: String::new(),
            elements: Vec::new(),
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

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Add a catalog element with amount 1; picking it again changes nothing
    pub fn add_element(&mut self, element: &RecreativeElement) {
        if self.elements.iter().any(|selected| selected.element_id == element.element) {
            debug!("Element {} already selected", element.element);
            return;
        }
        self.elements.push(SelectedElement {
            element_id: element.element,
            label: element.label.clone(),
            amount: 1,
            available: element.quantity,
        });
    }

    pub fn remove_element(&mut self, element_id: i64) {
        self.elements.retain(|selected| selected.element_id != element_id);
    }

    /// Set the requested amount, clamped to at least 1 and at most the stock
    pub fn change_quantity(&mut self, element_id: i64, amount: u32) -> Option<u32> {
        let selected = self
            .elements
            .iter_mut()
            .find(|selected| selected.element_id == element_id)?;
        selected.amount = selected.clamp_amount(amount);
        Some(selected.amount)
    }

    pub fn elements(&self) -> &[SelectedElement] {
        &self.elements
    }

    pub fn select_slot(&mut self, day: &str, hour: &str) -> Result<SlotSelection, BookingError> {
        match self.grid.select_slot(day, hour) {
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

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn schedule_view(&self, schedule: &ScheduleService) -> ScheduleView {
        schedule.selection_view(&self.grid, None)
    }

    pub fn build_request(&self) -> Result<CreateReservationRequest, BookingError> {
        let location = self.location.trim();
        let (selection, user_id) = match (self.grid.selection(), self.user.user_id()) {
            (Some(selection), Some(user_id)) if !self.elements.is_empty() && !location.is_empty() => {
                (selection, user_id)
            }
            _ => return Err(BookingError::MissingFields),
        };

        let mut request = CreateReservationRequest::for_slot(selection, user_id, location);
        request.state = Some(ReservationState::Activa);
        request.borrowed_elements = self
            .elements
            .iter()
            .map(|selected| BorrowedElementRequest {
                element_id: selected.element_id,
                amount: selected.amount,
            })
            .collect();
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
            "Creating element reservation: {} element(s) at {} for {} {}",
            request.borrowed_elements.len(),
            request.location,
            request.reserved_day,
            request.reserved_hour_block
        );
        match self.api.create_reservation(&request).await {
            Ok(reservation) => {
                info!("Element reservation {} created", reservation.id);
                self.reset();
                Ok(reservation)
            }
            Err(e) => {
                error!("Error creating element reservation: {}", e);
                Err(self.fail(e.into()))
            }
        }
    }

    pub fn reset(&mut self) {
        self.user.clear();
        self.location.clear();
        self.elements.clear();
        self.grid.reset();
        self.error_message = None;
    }

    fn fail(&mut self, error: BookingError) -> BookingError {
        self.error_message = Some(error.user_message());
        error
    }
}
