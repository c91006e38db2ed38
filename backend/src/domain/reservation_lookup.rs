//! Reservation search, per-user listing and cancellation.

use std::sync::Arc;

use shared::{Reservation, ReservationState};
use thiserror::Error;
use tracing::{info, warn};

use crate::io::{ApiError, ReservationApi};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Enter a reservation ID")]
    EmptyId,

    #[error("'{0}' is not a valid reservation ID")]
    InvalidId(String),

    #[error("No reservation found with ID {0}")]
    NotFound(i64),

    #[error("Reservation {0} is already cancelled")]
    AlreadyCancelled(i64),

    #[error("reservation service error: {0}")]
    Api(#[from] ApiError),
}

/// Parse a reservation ID typed into a search box
pub fn parse_reservation_id(input: &str) -> Result<i64, LookupError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LookupError::EmptyId);
    }
    match trimmed.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(LookupError::InvalidId(trimmed.to_string())),
    }
}

#[derive(Clone)]
pub struct ReservationLookupService {
    api: Arc<dyn ReservationApi>,
}

impl ReservationLookupService {
    pub fn new(api: Arc<dyn ReservationApi>) -> Self {
        Self { api }
    }

    /// Search box entry point: reservations matching the typed ID
    pub async fn search(&self, input: &str) -> Result<Vec<Reservation>, LookupError> {
        let id = parse_reservation_id(input)?;
        info!("Searching reservations for ID {}", id);
        let reservations = self.api.search_reservations(id).await?;
        info!("Search for {} returned {} reservation(s)", id, reservations.len());
        Ok(reservations)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Reservation>, LookupError> {
        let reservation = self.api.get_reservation(id).await?;
        if reservation.is_none() {
            warn!("Reservation {} not found", id);
        }
        Ok(reservation)
    }

    /// All reservations of one user, filtered client-side
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Reservation>, LookupError> {
        let reservations: Vec<Reservation> = self
            .api
            .list_reservations()
            .await?
            .into_iter()
            .filter(|reservation| reservation.user == user_id)
            .collect();
        info!("User {} has {} reservation(s)", user_id, reservations.len());
        Ok(reservations)
    }

    /// Mark a reservation as cancelled
    pub async fn cancel(&self, id: i64) -> Result<Reservation, LookupError> {
        let reservation = self
            .api
            .get_reservation(id)
            .await?
            .ok_or(LookupError::NotFound(id))?;
        if reservation.is_cancelled() {
            warn!("Reservation {} is already cancelled", id);
            return Err(LookupError::AlreadyCancelled(id));
        }

        let updated = self
            .api
            .update_reservation_state(id, ReservationState::Cancelada)
            .await?;
        info!("Reservation {} cancelled", id);
        Ok(updated)
    }
}
