//! # Reservations Backend
//!
//! All non-UI logic of the reservation client:
//! - **Domain**: booking forms, schedule views, lookup and catalog services
//! - **IO**: the remote reservation API and its HTTP client
//!
//! ```text
//! UI layer (any renderer)
//!     ↓
//! Domain layer (forms, services)
//!     ↓
//! IO layer (ReservationApi → remote HTTP service)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod logging;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

pub use config::{Config, SelectionPolicy};
pub use domain::*;
pub use io::*;

/// Services wired against one API client
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn ReservationApi>,
    pub selection_policy: SelectionPolicy,
    pub schedule_service: ScheduleService,
    pub catalog_service: CatalogService,
    pub reservation_lookup: ReservationLookupService,
}

impl AppState {
    pub fn new(api: Arc<dyn ReservationApi>, selection_policy: SelectionPolicy) -> Self {
        Self {
            schedule_service: ScheduleService::new(),
            catalog_service: CatalogService::new(api.clone()),
            reservation_lookup: ReservationLookupService::new(api.clone()),
            api,
            selection_policy,
        }
    }

    /// A fresh room booking form using the configured selection policy
    pub fn room_booking_form(&self) -> RoomBookingForm {
        RoomBookingForm::new(self.api.clone(), self.selection_policy)
    }

    pub fn element_booking_form(&self) -> ElementBookingForm {
        ElementBookingForm::new(self.api.clone())
    }

    pub fn return_register_form(&self) -> ReturnRegisterForm {
        ReturnRegisterForm::new(self.api.clone())
    }
}

/// Build the application state from configuration
pub fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up reservation API client");
    let api = HttpReservationApi::new(&config.api_base_url, config.http_timeout)?;

    info!("Setting up domain services (selection policy: {:?})", config.selection_policy);
    Ok(AppState::new(Arc::new(api), config.selection_policy))
}
