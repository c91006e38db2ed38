//! Runs the HTTP client against an in-process axum server that mimics the
//! remote reservation service.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use reservations_backend::{
    ApiError, AppState, HttpReservationApi, ReservationApi, SelectionPolicy,
};
use serde_json::{json, Value};
use shared::{CreateReservationRequest, Day, HourBlock, ReservationState};

#[derive(Clone, Default)]
struct MockState {
    created: Arc<Mutex<Vec<Value>>>,
    patched: Arc<Mutex<Vec<(i64, Value)>>>,
    registers: Arc<Mutex<Vec<Value>>>,
}

fn availability() -> Value {
    let mut rows = vec![vec![0; 6]; 8];
    rows[2][3] = 1;
    json!(rows)
}

fn reservation_json(id: i64, state: &str) -> Value {
    json!({
        "id": id,
        "location": "Bloque B - 204",
        "state": state,
        "reserved_day": "Lunes",
        "reserved_hour_block": "7:00-8:30",
        "user": 5,
        "room": 2,
        "borrowed_elements": []
    })
}

async fn list_rooms() -> Json<Value> {
    Json(json!([{
        "id": 2,
        "location": "Bloque B - 204",
        "capacity": 30,
        "description": "Sala de estudio",
        "availability": availability()
    }]))
}

async fn list_elements() -> Json<Value> {
    Json(json!([{ "element": 4, "label": "Balón", "quantity": 3 }]))
}

async fn get_user(Path(identification): Path<String>) -> impl IntoResponse {
    if identification == "1020" {
        (StatusCode::OK, Json(json!({ "id": 5, "name": "Ana", "identification": "1020" }))).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
    }
}

async fn create_reservation(State(state): State<MockState>, Json(body): Json<Value>) -> impl IntoResponse {
    if body["reserved_day"] == "Sábado" && body["reserved_hour_block"] == "17:30-19:00" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "Horario no disponible" }))).into_response();
    }
    state.created.lock().unwrap().push(body.clone());
    let mut created = body;
    created["id"] = json!(31);
    if created["state"].is_null() {
        created["state"] = json!("activa");
    }
    let borrowed: Vec<Value> = created["borrowed_elements"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            json!({
                "element": entry["element_id"],
                "amount": entry["amount"],
                "element_details": { "id": entry["element_id"], "name": "Balón" }
            })
        })
        .collect();
    created["borrowed_elements"] = json!(borrowed);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn search_reservations(Path(id): Path<i64>) -> Json<Value> {
    Json(json!([reservation_json(id, "activa")]))
}

async fn get_reservation(Path(id): Path<i64>) -> impl IntoResponse {
    if id == 99 {
        (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
    } else if id == 40 {
        let mut loan = reservation_json(id, "activa");
        loan["room"] = Value::Null;
        loan["borrowed_elements"] = json!([
            { "element": 4, "amount": 2, "element_details": { "id": 4, "name": "Balón" } }
        ]);
        (StatusCode::OK, Json(loan)).into_response()
    } else {
        (StatusCode::OK, Json(reservation_json(id, "activa"))).into_response()
    }
}

async fn patch_reservation(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.patched.lock().unwrap().push((id, body.clone()));
    Json(reservation_json(id, body["state"].as_str().unwrap_or("activa")))
}

async fn list_registers(State(state): State<MockState>) -> Json<Value> {
    Json(json!(state.registers.lock().unwrap().clone()))
}

async fn create_register(State(state): State<MockState>, Json(body): Json<Value>) -> impl IntoResponse {
    let mut registers = state.registers.lock().unwrap();
    let mut created = body;
    created["register_id"] = json!(registers.len() + 1);
    registers.push(created.clone());
    (StatusCode::CREATED, Json(created))
}

async fn broken_rooms() -> Json<Value> {
    Json(json!([{
        "id": 1,
        "location": "Sala rota",
        "capacity": 10,
        "description": "",
        "availability": [[0, 0, 0]]
    }]))
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn start_mock() -> (MockState, HttpReservationApi) {
    let state = MockState::default();
    let app = Router::new()
        .route("/room/", get(list_rooms))
        .route("/recreative-elements/", get(list_elements))
        .route("/user/:identification/", get(get_user))
        .route("/reservation/", post(create_reservation))
        .route("/reservation/:id", get(search_reservations))
        .route("/reservation/:id/", get(get_reservation).patch(patch_reservation))
        .route("/register/", get(list_registers).post(create_register))
        .with_state(state.clone());
    let addr = spawn(app).await;

    let api = HttpReservationApi::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    (state, api)
}

#[tokio::test]
async fn test_fetch_rooms_decodes_matrix() {
    let (_state, api) = start_mock().await;
    let rooms = api.fetch_rooms().await.unwrap();

    assert_eq!(rooms.len(), 1);
    assert!(!rooms[0].availability.is_available_at(2, 3));
    assert!(rooms[0].availability.is_available(HourBlock::Block0700, Day::Lunes));
}

#[tokio::test]
async fn test_malformed_matrix_is_a_decode_error() {
    let addr = spawn(Router::new().route("/room/", get(broken_rooms))).await;
    let api = HttpReservationApi::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();

    let err = api.fetch_rooms().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(ref message) if message.contains("8x6")));
}

#[tokio::test]
async fn test_user_lookup_and_not_found() {
    let (_state, api) = start_mock().await;
    assert_eq!(api.get_user_by_identification("1020").await.unwrap().id, 5);

    let err = api.get_user_by_identification("0000").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_get_reservation_maps_404_to_none() {
    let (_state, api) = start_mock().await;
    assert!(api.get_reservation(99).await.unwrap().is_none());
    assert_eq!(api.get_reservation(7).await.unwrap().unwrap().id, 7);
    assert_eq!(api.search_reservations(8).await.unwrap()[0].id, 8);
}

#[tokio::test]
async fn test_create_reservation_error_detail() {
    let (_state, api) = start_mock().await;
    let slot = shared::parse_slot("Sábado", "17:30-19:00").unwrap();
    let request = CreateReservationRequest::for_slot(&slot, 5, "Coliseo");

    let err = api.create_reservation(&request).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 400, .. }));
    assert_eq!(err.detail().as_deref(), Some("Horario no disponible"));
}

#[tokio::test]
async fn test_room_booking_end_to_end() {
    let (state, api) = start_mock().await;
    let app = AppState::new(Arc::new(api), SelectionPolicy::AvailabilityGated);

    let room = app.catalog_service.room(2).await.unwrap().unwrap();
    let mut form = app.room_booking_form();
    form.set_identification("1020");
    form.lookup_user().await.unwrap();
    form.select_room(room);

    // occupied in the room matrix, rejected by the gated policy
    assert!(form.select_slot("Jueves", "10:00-11:30").is_err());
    form.select_slot("Miércoles", "10:00-11:30").unwrap();

    let reservation = form.submit().await.unwrap();
    assert_eq!(reservation.id, 31);
    assert_eq!(reservation.state, ReservationState::Activa);

    let created = state.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["reserved_day"], "Miércoles");
    assert_eq!(created[0]["reserved_hour_block"], "10:00-11:30");
    assert_eq!(created[0]["room"], 2);
    assert_eq!(created[0]["user"], 5);
    assert_eq!(created[0]["borrowed_elements"], json!([]));
}

#[tokio::test]
async fn test_cancel_sends_patch() {
    let (state, api) = start_mock().await;
    let app = AppState::new(Arc::new(api), SelectionPolicy::Raw);

    let cancelled = app.reservation_lookup.cancel(12).await.unwrap();
    assert_eq!(cancelled.state, ReservationState::Cancelada);

    let patched = state.patched.lock().unwrap();
    assert_eq!(patched.as_slice(), &[(12, json!({ "state": "cancelada" }))]);
}

#[tokio::test]
async fn test_element_booking_end_to_end() {
    let (state, api) = start_mock().await;
    let app = AppState::new(Arc::new(api), SelectionPolicy::Raw);

    let elements = app.catalog_service.elements().await.unwrap();
    let mut form = app.element_booking_form();
    form.set_identification("1020");
    form.lookup_user().await.unwrap();
    form.set_location("Coliseo");
    form.add_element(&elements[0]);
    form.change_quantity(4, 2);
    form.select_slot("Viernes", "14:30-16:00").unwrap();

    form.submit().await.unwrap();

    let created = state.created.lock().unwrap();
    assert_eq!(created[0]["room"], Value::Null);
    assert_eq!(created[0]["state"], "activa");
    assert_eq!(created[0]["borrowed_elements"], json!([{ "element_id": 4, "amount": 2 }]));
}

#[tokio::test]
async fn test_return_register_end_to_end() {
    let (state, api) = start_mock().await;
    let app = AppState::new(Arc::new(api), SelectionPolicy::Raw);

    let mut form = app.return_register_form();
    form.set_identifier("40");
    assert_eq!(form.load_reservation().await.unwrap().len(), 1);

    let register = form.submit().await.unwrap();
    assert_eq!(register.register_id, Some(1));
    assert_eq!(register.reservation_id, Some(40));

    {
        let posted = state.registers.lock().unwrap();
        assert_eq!(posted[0]["reservation_id"], 40);
        assert_eq!(
            posted[0]["returned_elements"],
            json!([{ "codigo": "4", "nombre": "Balón", "estado": "RETURNED_GOOD", "cantidad": 2 }])
        );
    }

    let registers = form.registers().await.unwrap();
    assert_eq!(registers.len(), 1);
    assert_eq!(registers[0].summary(), "Balón (2)");
}
