//! Return registers: record the elements handed back for a reservation.
//!
//! The form loads a reservation by ID, turns each borrowed element into a
//! register line, and posts the register once there is something to record.

use std::sync::Arc;

use shared::{CreateRegisterRequest, Register, ReturnedElement};
use thiserror::Error;
use tracing::{error, info, warn};

use super::reservation_lookup::{parse_reservation_id, LookupError, ReservationLookupService};
use crate::io::{ApiError, ReservationApi};

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Missing data: load a reservation with at least one borrowed element")]
    MissingData,

    #[error("reservation service error: {0}")]
    Api(#[from] ApiError),
}

impl RegisterError {
    /// Message shown next to the form; prefers the server's `detail`
    pub fn user_message(&self) -> String {
        match self {
            RegisterError::Api(api_error) | RegisterError::Lookup(LookupError::Api(api_error)) => {
                api_error.detail().unwrap_or_else(|| self.to_string())
            }
            other => other.to_string(),
        }
    }
}

pub struct ReturnRegisterForm {
    api: Arc<dyn ReservationApi>,
    lookup: ReservationLookupService,
    identifier: String,
    reservation_id: Option<i64>,
    returned_elements: Vec<ReturnedElement>,
    error_message: Option<String>,
}

impl ReturnRegisterForm {
    pub fn new(api: Arc<dyn ReservationApi>) -> Self {
        Self {
            lookup: ReservationLookupService::new(api.clone()),
            api,
            identifier: String::new(),
            reservation_id: None,
            returned_elements: Vec::new(),
            error_message: None,
        }
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
    }

    /// Load the reservation typed in the search box and prefill its lines
    pub async fn load_reservation(&mut self) -> Result<&[ReturnedElement], RegisterError> {
        self.error_message = None;
        let id = match parse_reservation_id(&self.identifier) {
            Ok(id) => id,
            Err(e) => return Err(self.fail(e.into())),
        };

        let reservation = match self.lookup.get_by_id(id).await {
            Ok(Some(reservation)) => reservation,
            Ok(None) => return Err(self.fail(LookupError::NotFound(id).into())),
            Err(e) => return Err(self.fail(e.into())),
        };

        self.reservation_id = Some(reservation.id);
        self.returned_elements = reservation
            .borrowed_elements
            .iter()
            .map(ReturnedElement::from_borrowed)
            .collect();
        info!(
            "Loaded reservation {} with {} borrowed element(s) for return",
            reservation.id,
            self.returned_elements.len()
        );
        Ok(&self.returned_elements)
    }

    pub fn reservation_id(&self) -> Option<i64> {
        self.reservation_id
    }

    pub fn returned_elements(&self) -> &[ReturnedElement] {
        &self.returned_elements
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn build_request(&self) -> Result<CreateRegisterRequest, RegisterError> {
        match self.reservation_id {
            Some(reservation_id) if !self.returned_elements.is_empty() => Ok(CreateRegisterRequest {
                reservation_id,
                returned_elements: self.returned_elements.clone(),
            }),
            _ => Err(RegisterError::MissingData),
        }
    }

    /// Post the register; a successful submit clears the loaded reservation
    pub async fn submit(&mut self) -> Result<Register, RegisterError> {
        self.error_message = None;
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                warn!("Return register incomplete: {}", e);
                return Err(self.fail(e));
            }
        };

        match self.api.create_register(&request).await {
            Ok(register) => {
                info!(
                    "Return register {:?} created for reservation {}",
                    register.register_id, request.reservation_id
                );
                self.reset();
                Ok(register)
            }
            Err(e) => {
                error!("Error creating return register: {}", e);
                Err(self.fail(e.into()))
            }
        }
    }

    pub async fn registers(&self) -> Result<Vec<Register>, RegisterError> {
        Ok(self.api.list_registers().await?)
    }

    pub fn reset(&mut self) {
        self.identifier.clear();
        self.reservation_id = None;
        self.returned_elements.clear();
        self.error_message = None;
    }

    fn fail(&mut self, error: RegisterError) -> RegisterError {
        self.error_message = Some(error.user_message());
        error
    }
}
