//! Pieces shared by the room and element booking forms: the error type and
//! the identification -> user lookup step.

use shared::{ScheduleError, User};
use thiserror::Error;
use tracing::{info, warn};

use crate::io::{ApiError, ReservationApi};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Please enter an identification")]
    EmptyIdentification,

    #[error("No user found with identification '{0}'")]
    UserNotFound(String),

    #[error("You must select a time slot and a room")]
    MissingSlotOrRoom,

    #[error("You must look up a valid user first")]
    MissingUser,

    #[error("All fields are required: user, time slot, location and selected elements")]
    MissingFields,

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("reservation service error: {0}")]
    Api(#[from] ApiError),
}

impl BookingError {
    /// Message shown next to the form; prefers the server's `detail`
    pub fn user_message(&self) -> String {
        match self {
            BookingError::Api(api_error) => api_error.detail().unwrap_or_else(|| self.to_string()),
            other => other.to_string(),
        }
    }
}

/// Identification input and the user it resolved to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserLookup {
    identification: String,
    user: Option<User>,
}

impl UserLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identification(&self) -> &str {
        &self.identification
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|user| user.id)
    }

    /// Editing the identification invalidates any resolved user
    pub fn set_identification(&mut self, identification: impl Into<String>) {
        self.identification = identification.into();
        self.user = None;
    }

    pub async fn resolve(&mut self, api: &dyn ReservationApi) -> Result<User, BookingError> {
        let identification = self.identification.trim().to_string();
        if identification.is_empty() {
            self.user = None;
            return Err(BookingError::EmptyIdentification);
        }

        match api.get_user_by_identification(&identification).await {
            Ok(user) => {
                info!("Resolved identification {} to user {}", identification, user.id);
                self.user = Some(user.clone());
                Ok(user)
            }
            Err(e) if e.is_not_found() => {
                warn!("No user for identification {}", identification);
                self.user = None;
                Err(BookingError::UserNotFound(identification))
            }
            Err(e) => {
                self.user = None;
                Err(BookingError::Api(e))
            }
        }
    }

    pub fn clear(&mut self) {
        self.identification.clear();
        self.user = None;
    }
}
