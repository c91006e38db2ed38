//! # Reservation API boundary
//!
//! Everything the client knows about the remote reservation service goes
//! through [`ReservationApi`]. Domain services hold it as
//! `Arc<dyn ReservationApi>` so they can run against the HTTP client in
//! production and an in-memory fake in tests.

use async_trait::async_trait;
use shared::{
    CreateRegisterRequest, CreateReservationRequest, NewRecreativeElement, NewRoom,
    RecreativeElement, Register, Reservation, ReservationState, Room, User,
};
use thiserror::Error;

/// Errors surfaced by the remote API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid API base URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// Server-provided `detail` message when the body is a JSON error
    pub fn detail(&self) -> Option<String> {
        match self {
            ApiError::Status { body, .. } => serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|value| value.get("detail").and_then(|d| d.as_str()).map(str::to_string)),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Data source and selection sink of the booking flows
#[async_trait]
pub trait ReservationApi: Send + Sync {
    /// List every room with its availability matrix
    async fn fetch_rooms(&self) -> ApiResult<Vec<Room>>;

    async fn create_room(&self, room: &NewRoom) -> ApiResult<Room>;

    async fn delete_room(&self, room_id: i64) -> ApiResult<()>;

    /// List the recreational element catalog
    async fn fetch_elements(&self) -> ApiResult<Vec<RecreativeElement>>;

    async fn create_element(&self, element: &NewRecreativeElement) -> ApiResult<RecreativeElement>;

    async fn delete_element(&self, element_id: i64) -> ApiResult<()>;

    /// Resolve a user from an identification document
    async fn get_user_by_identification(&self, identification: &str) -> ApiResult<User>;

    async fn create_reservation(&self, request: &CreateReservationRequest) -> ApiResult<Reservation>;

    async fn list_reservations(&self) -> ApiResult<Vec<Reservation>>;

    /// Search endpoint; returns every reservation the service matches for `id`
    async fn search_reservations(&self, id: i64) -> ApiResult<Vec<Reservation>>;

    /// Fetch one reservation; `Ok(None)` when the service answers 404
    async fn get_reservation(&self, id: i64) -> ApiResult<Option<Reservation>>;

    async fn update_reservation_state(&self, id: i64, state: ReservationState) -> ApiResult<Reservation>;

    /// Return registers recorded so far
    async fn list_registers(&self) -> ApiResult<Vec<Register>>;

    async fn create_register(&self, request: &CreateRegisterRequest) -> ApiResult<Register>;
}
