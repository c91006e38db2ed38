//! Catalog of rooms and recreational elements, including the admin
//! operations that create and delete them.

use std::sync::Arc;

use shared::{AvailabilityMatrix, NewRecreativeElement, NewRoom, RecreativeElement, Room};
use thiserror::Error;
use tracing::info;

use crate::io::{ApiError, ReservationApi};

/// State assigned to freshly created rooms
pub const NEW_ROOM_STATE: &str = "disponible";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Location is required")]
    EmptyLocation,

    #[error("Capacity must be a positive number")]
    InvalidCapacity,

    #[error("Element name is required")]
    EmptyName,

    #[error("Quantity must be a positive number")]
    InvalidQuantity,

    #[error("reservation service error: {0}")]
    Api(#[from] ApiError),
}

/// Admin form input for a new room; numbers arrive as typed text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomDraft {
    pub location: String,
    pub capacity: String,
    pub description: String,
}

/// Admin form input for a new recreational element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementDraft {
    pub name: String,
    pub quantity: String,
}

fn parse_positive(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|value| *value > 0)
}

impl RoomDraft {
    pub fn validate(&self) -> Result<NewRoom, CatalogError> {
        let location = self.location.trim();
        if location.is_empty() {
            return Err(CatalogError::EmptyLocation);
        }
        let capacity = parse_positive(&self.capacity).ok_or(CatalogError::InvalidCapacity)?;

        Ok(NewRoom {
            location: location.to_string(),
            capacity,
            description: self.description.trim().to_string(),
            availability: AvailabilityMatrix::all_free(),
            state: NEW_ROOM_STATE.to_string(),
        })
    }
}

impl ElementDraft {
    pub fn validate(&self) -> Result<NewRecreativeElement, CatalogError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        let quantity = parse_positive(&self.quantity).ok_or(CatalogError::InvalidQuantity)?;

        Ok(NewRecreativeElement {
            name: name.to_string(),
            quantity,
        })
    }
}

#[derive(Clone)]
pub struct CatalogService {
    api: Arc<dyn ReservationApi>,
}

impl CatalogService {
    pub fn new(api: Arc<dyn ReservationApi>) -> Self {
        Self { api }
    }

    pub async fn rooms(&self) -> Result<Vec<Room>, CatalogError> {
        Ok(self.api.fetch_rooms().await?)
    }

    pub async fn room(&self, room_id: i64) -> Result<Option<Room>, CatalogError> {
        Ok(self.rooms().await?.into_iter().find(|room| room.id == room_id))
    }

    pub async fn elements(&self) -> Result<Vec<RecreativeElement>, CatalogError> {
        Ok(self.api.fetch_elements().await?)
    }

    pub async fn create_room(&self, draft: &RoomDraft) -> Result<Room, CatalogError> {
        let new_room = draft.validate()?;
        let room = self.api.create_room(&new_room).await?;
        info!("Created room {} at {}", room.id, room.location);
        Ok(room)
    }

    pub async fn delete_room(&self, room_id: i64) -> Result<(), CatalogError> {
        self.api.delete_room(room_id).await?;
        info!("Deleted room {}", room_id);
        Ok(())
    }

    pub async fn create_element(&self, draft: &ElementDraft) -> Result<RecreativeElement, CatalogError> {
        let new_element = draft.validate()?;
        let element = self.api.create_element(&new_element).await?;
        info!("Created element {} ({})", element.element, element.label);
        Ok(element)
    }

    pub async fn delete_element(&self, element_id: i64) -> Result<(), CatalogError> {
        self.api.delete_element(element_id).await?;
        info!("Deleted element {}", element_id);
        Ok(())
    }
}
