//! In-memory stand-in for the remote reservation service, used by domain tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use shared::{
    AvailabilityMatrix, BorrowedElement, CreateRegisterRequest, CreateReservationRequest,
    ElementDetails, NewRecreativeElement, NewRoom, RecreativeElement, Register, Reservation,
    ReservationState, Room, User, DAY_COUNT, HOUR_BLOCK_COUNT,
};

use crate::io::{ApiError, ApiResult, ReservationApi};

#[derive(Default)]
struct FakeState {
    rooms: Vec<Room>,
    elements: Vec<RecreativeElement>,
    users: Vec<User>,
    reservations: Vec<Reservation>,
    registers: Vec<Register>,
    next_id: i64,
    fail_writes: bool,
}

/// Fake API backed by vectors; every write is visible to later reads
#[derive(Default)]
pub struct FakeReservationApi {
    state: Mutex<FakeState>,
    stall_next_create: AtomicBool,
}

impl FakeReservationApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.state.lock().unwrap().next_id = 100;
        api
    }

    pub fn with_user(self, id: i64, identification: &str) -> Self {
        self.state.lock().unwrap().users.push(User {
            id,
            name: format!("User {}", id),
            identification: identification.to_string(),
        });
        self
    }

    pub fn with_room(self, room: Room) -> Self {
        self.state.lock().unwrap().rooms.push(room);
        self
    }

    pub fn with_element(self, element: i64, label: &str, quantity: u32) -> Self {
        self.state.lock().unwrap().elements.push(RecreativeElement {
            element,
            label: label.to_string(),
            quantity,
        });
        self
    }

    pub fn with_reservation(self, reservation: Reservation) -> Self {
        self.state.lock().unwrap().reservations.push(reservation);
        self
    }

    /// The next `create_reservation` never resolves
    pub fn stalling_next_create(self) -> Self {
        self.stall_next_create.store(true, Ordering::SeqCst);
        self
    }

    /// Make every write answer with a 500
    pub fn failing_writes(self) -> Self {
        self.state.lock().unwrap().fail_writes = true;
        self
    }

    pub fn reservations(&self) -> Vec<Reservation> {
        self.state.lock().unwrap().reservations.clone()
    }

    pub fn registers(&self) -> Vec<Register> {
        self.state.lock().unwrap().registers.clone()
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.state.lock().unwrap().rooms.clone()
    }

    pub fn elements(&self) -> Vec<RecreativeElement> {
        self.state.lock().unwrap().elements.clone()
    }

    fn write_guard(state: &FakeState) -> ApiResult<()> {
        if state.fail_writes {
            return Err(ApiError::Status {
                status: 500,
                body: r#"{"detail":"Error interno"}"#.to_string(),
            });
        }
        Ok(())
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: 404,
            body: "Not found".to_string(),
        }
    }

    fn allocate_id(state: &mut FakeState) -> i64 {
        state.next_id += 1;
        state.next_id
    }
}

/// Room fixture with the given `(hour_index, day_index)` cells occupied
pub fn sample_room(id: i64, location: &str, occupied: &[(usize, usize)]) -> Room {
    let mut cells = [[0; DAY_COUNT]; HOUR_BLOCK_COUNT];
    for &(hour, day) in occupied {
        cells[hour][day] = 1;
    }
    Room {
        id,
        location: location.to_string(),
        capacity: 25,
        description: "Sala de pruebas".to_string(),
        availability: AvailabilityMatrix::new(cells),
    }
}

/// Element reservation fixture lending `(element id, name, amount)` entries
pub fn sample_loan(id: i64, user: i64, loans: &[(i64, &str, u32)]) -> Reservation {
    let mut reservation = sample_reservation(id, user, ReservationState::Activa);
    reservation.room = None;
    reservation.borrowed_elements = loans
        .iter()
        .map(|&(element, name, amount)| BorrowedElement {
            element,
            amount,
            element_details: ElementDetails {
                id: element,
                name: name.to_string(),
            },
        })
        .collect();
    reservation
}

pub fn sample_reservation(id: i64, user: i64, state: ReservationState) -> Reservation {
    Reservation {
        id,
        location: "Bloque A".to_string(),
        state,
        reserved_day: "Lunes".to_string(),
        reserved_hour_block: "7:00-8:30".to_string(),
        user,
        room: Some(1),
        borrowed_elements: Vec::new(),
    }
}

#[async_trait]
impl ReservationApi for FakeReservationApi {
    async fn fetch_rooms(&self) -> ApiResult<Vec<Room>> {
        Ok(self.rooms())
    }

    async fn create_room(&self, room: &NewRoom) -> ApiResult<Room> {
        let mut state = self.state.lock().unwrap();
        Self::write_guard(&state)?;
        let created = Room {
            id: Self::allocate_id(&mut state),
            location: room.location.clone(),
            capacity: room.capacity,
            description: room.description.clone(),
            availability: room.availability.clone(),
        };
        state.rooms.push(created.clone());
        Ok(created)
    }

    async fn delete_room(&self, room_id: i64) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::write_guard(&state)?;
        let before = state.rooms.len();
        state.rooms.retain(|room| room.id != room_id);
        if state.rooms.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn fetch_elements(&self) -> ApiResult<Vec<RecreativeElement>> {
        Ok(self.elements())
    }

    async fn create_element(&self, element: &NewRecreativeElement) -> ApiResult<RecreativeElement> {
        let mut state = self.state.lock().unwrap();
        Self::write_guard(&state)?;
        let created = RecreativeElement {
            element: Self::allocate_id(&mut state),
            label: element.name.clone(),
            quantity: element.quantity,
        };
        state.elements.push(created.clone());
        Ok(created)
    }

    async fn delete_element(&self, element_id: i64) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::write_guard(&state)?;
        let before = state.elements.len();
        state.elements.retain(|element| element.element != element_id);
        if state.elements.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn get_user_by_identification(&self, identification: &str) -> ApiResult<User> {
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|user| user.identification == identification)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_reservation(&self, request: &CreateReservationRequest) -> ApiResult<Reservation> {
        if self.stall_next_create.swap(false, Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let mut state = self.state.lock().unwrap();
        Self::write_guard(&state)?;
        let borrowed_elements = request
            .borrowed_elements
            .iter()
            .map(|entry| BorrowedElement {
                element: entry.element_id,
                amount: entry.amount,
                element_details: ElementDetails {
                    id: entry.element_id,
                    name: state
                        .elements
                        .iter()
                        .find(|element| element.element == entry.element_id)
                        .map(|element| element.label.clone())
                        .unwrap_or_default(),
                },
            })
            .collect();
        let reservation = Reservation {
            id: Self::allocate_id(&mut state),
            location: request.location.clone(),
            state: request.state.unwrap_or(ReservationState::Activa),
            reserved_day: request.reserved_day.clone(),
            reserved_hour_block: request.reserved_hour_block.clone(),
            user: request.user,
            room: request.room,
            borrowed_elements,
        };
        state.reservations.push(reservation.clone());
        Ok(reservation)
    }

    async fn list_reservations(&self) -> ApiResult<Vec<Reservation>> {
        Ok(self.reservations())
    }

    async fn search_reservations(&self, id: i64) -> ApiResult<Vec<Reservation>> {
        Ok(self
            .reservations()
            .into_iter()
            .filter(|reservation| reservation.id == id)
            .collect())
    }

    async fn get_reservation(&self, id: i64) -> ApiResult<Option<Reservation>> {
        Ok(self.reservations().into_iter().find(|reservation| reservation.id == id))
    }

    async fn update_reservation_state(&self, id: i64, new_state: ReservationState) -> ApiResult<Reservation> {
        let mut state = self.state.lock().unwrap();
        Self::write_guard(&state)?;
        let reservation = state
            .reservations
            .iter_mut()
            .find(|reservation| reservation.id == id)
            .ok_or_else(Self::not_found)?;
        reservation.state = new_state;
        Ok(reservation.clone())
    }

    async fn list_registers(&self) -> ApiResult<Vec<Register>> {
        Ok(self.registers())
    }

    async fn create_register(&self, request: &CreateRegisterRequest) -> ApiResult<Register> {
        let mut state = self.state.lock().unwrap();
        Self::write_guard(&state)?;
        let register = Register {
            register_id: Some(Self::allocate_id(&mut state)),
            reservation_id: Some(request.reservation_id),
            returned_elements: request.returned_elements.clone(),
        };
        state.registers.push(register.clone());
        Ok(register)
    }
}
