use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use shared::{
    CreateRegisterRequest, CreateReservationRequest, NewRecreativeElement, NewRoom,
    RecreativeElement, Register, Reservation, ReservationState, Room,
    UpdateReservationStateRequest, User,
};
use tracing::{debug, error, info, warn};

use super::api::{ApiError, ApiResult, ReservationApi};

/// Client for the remote reservation service over HTTP
#[derive(Clone)]
pub struct HttpReservationApi {
    client: Client,
    base_url: Url,
}

impl HttpReservationApi {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;
        info!("Reservation API client targeting {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/<segments...>[/]`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str], trailing_slash: bool) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
            if trailing_slash {
                path.push("");
            }
        }
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let body = Self::success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn success_body(response: Response) -> ApiResult<String> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl ReservationApi for HttpReservationApi {
    async fn fetch_rooms(&self) -> ApiResult<Vec<Room>> {
        let url = self.endpoint(&["room"], true)?;
        debug!("GET {}", url);
        let rooms: Vec<Room> = Self::decode(self.client.get(url).send().await?).await?;
        info!("Fetched {} rooms", rooms.len());
        Ok(rooms)
    }

    async fn create_room(&self, room: &NewRoom) -> ApiResult<Room> {
        let url = self.endpoint(&["room"], true)?;
        debug!("POST {} - location: {}", url, room.location);
        Self::decode(self.client.post(url).json(room).send().await?).await
    }

    async fn delete_room(&self, room_id: i64) -> ApiResult<()> {
        let url = self.endpoint(&["room", &room_id.to_string()], true)?;
        debug!("DELETE {}", url);
        Self::success_body(self.client.delete(url).send().await?).await?;
        Ok(())
    }

    async fn fetch_elements(&self) -> ApiResult<Vec<RecreativeElement>> {
        let url = self.endpoint(&["recreative-elements"], true)?;
        debug!("GET {}", url);
        let elements: Vec<RecreativeElement> = Self::decode(self.client.get(url).send().await?).await?;
        info!("Fetched {} recreational elements", elements.len());
        Ok(elements)
    }

    async fn create_element(&self, element: &NewRecreativeElement) -> ApiResult<RecreativeElement> {
        let url = self.endpoint(&["recreative-elements"], true)?;
        debug!("POST {} - name: {}", url, element.name);
        Self::decode(self.client.post(url).json(element).send().await?).await
    }

    async fn delete_element(&self, element_id: i64) -> ApiResult<()> {
        let url = self.endpoint(&["recreative-elements", &element_id.to_string()], true)?;
        debug!("DELETE {}", url);
        Self::success_body(self.client.delete(url).send().await?).await?;
        Ok(())
    }

    async fn get_user_by_identification(&self, identification: &str) -> ApiResult<User> {
        let url = self.endpoint(&["user", identification], true)?;
        debug!("GET {}", url);
        Self::decode(self.client.get(url).send().await?)
            .await
            .map_err(|e| {
                error!("Error fetching user: {}", e);
                e
            })
    }

    async fn create_reservation(&self, request: &CreateReservationRequest) -> ApiResult<Reservation> {
        let url = self.endpoint(&["reservation"], true)?;
        debug!("POST {} - request: {:?}", url, request);
        Self::decode(self.client.post(url).json(request).send().await?)
            .await
            .map_err(|e| {
                error!("Error creating reservation: {}", e);
                e
            })
    }

    async fn list_reservations(&self) -> ApiResult<Vec<Reservation>> {
        let url = self.endpoint(&["reservation"], true)?;
        debug!("GET {}", url);
        Self::decode(self.client.get(url).send().await?).await
    }

    async fn search_reservations(&self, id: i64) -> ApiResult<Vec<Reservation>> {
        let url = self.endpoint(&["reservation", &id.to_string()], false)?;
        debug!("GET {}", url);
        Self::decode(self.client.get(url).send().await?)
            .await
            .map_err(|e| {
                error!("Error searching reservations: {}", e);
                e
            })
    }

    async fn get_reservation(&self, id: i64) -> ApiResult<Option<Reservation>> {
        let url = self.endpoint(&["reservation", &id.to_string()], true)?;
        debug!("GET {}", url);
        match Self::decode(self.client.get(url).send().await?).await {
            Ok(reservation) => Ok(Some(reservation)),
            Err(e) if e.is_not_found() => {
                warn!("Reservation {} not found", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update_reservation_state(&self, id: i64, state: ReservationState) -> ApiResult<Reservation> {
        let url = self.endpoint(&["reservation", &id.to_string()], true)?;
        debug!("PATCH {} - state: {}", url, state);
        let body = UpdateReservationStateRequest { state };
        Self::decode(self.client.patch(url).json(&body).send().await?).await
    }

    async fn list_registers(&self) -> ApiResult<Vec<Register>> {
        let url = self.endpoint(&["register"], true)?;
        debug!("GET {}", url);
        let registers: Vec<Register> = Self::decode(self.client.get(url).send().await?).await?;
        info!("Fetched {} return registers", registers.len());
        Ok(registers)
    }

    async fn create_register(&self, request: &CreateRegisterRequest) -> ApiResult<Register> {
        let url = self.endpoint(&["register"], true)?;
        debug!(
            "POST {} - reservation: {}, {} element(s)",
            url,
            request.reservation_id,
            request.returned_elements.len()
        );
        Self::decode(self.client.post(url).json(request).send().await?)
            .await
            .map_err(|e| {
                error!("Error creating return register: {}", e);
                e
            })
    }
}
