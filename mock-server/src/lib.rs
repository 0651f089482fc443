//! In-memory mock of the Pushbullet v2 REST API subset the client uses.
//!
//! # Design
//! Stores are `Vec`s behind one `RwLock`, so list responses preserve
//! insertion order and collection tests can assert on element order. Every
//! route sits behind an HTTP Basic check against the key the app was
//! constructed with; failures answer 401 with a Pushbullet-style
//! `{"error": ...}` body. Pushes are stored as the raw submitted parameter
//! mapping (with `device_iden` renamed to `target_device_iden`, as the real
//! service reports it), so tests can verify exactly which keys the client
//! sent over the wire.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize)]
pub struct Contact {
    pub iden: String,
    pub name: String,
    pub email: String,
    pub created: f64,
    pub modified: f64,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct Device {
    pub iden: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub active: bool,
    pub pushable: bool,
    pub created: f64,
    pub modified: f64,
}

#[derive(Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct ContactUpdate {
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct NewDevice {
    pub nickname: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub push_token: Option<String>,
    pub app_version: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Deserialize)]
pub struct DeviceUpdate {
    pub nickname: Option<String>,
}

#[derive(Default)]
struct Store {
    contacts: Vec<Contact>,
    devices: Vec<Device>,
    pushes: Vec<Value>,
}

#[derive(Clone)]
struct AppState {
    authorization: String,
    store: Arc<RwLock<Store>>,
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        authorization: format!("Basic {}", STANDARD.encode(format!("{api_key}:{api_key}"))),
        store: Arc::default(),
    };
    Router::new()
        .route("/v2/contacts", get(list_contacts).post(create_contact))
        .route(
            "/v2/contacts/{iden}",
            post(update_contact).delete(delete_contact),
        )
        .route("/v2/devices", get(list_devices).post(create_device))
        .route(
            "/v2/devices/{iden}",
            post(update_device).delete(delete_device),
        )
        .route("/v2/users/me", get(get_me))
        .route("/v2/pushes", get(list_pushes).post(create_push))
        .layer(middleware::from_fn_with_state(state.clone(), check_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

async fn check_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if presented != Some(state.authorization.as_str()) {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "Access token is missing or invalid.",
        );
    }
    next.run(request).await
}

async fn list_contacts(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.read().await;
    Json(json!({ "contacts": store.contacts }))
}

async fn create_contact(
    State(state): State<AppState>,
    Json(input): Json<NewContact>,
) -> Json<Contact> {
    let now = epoch();
    let contact = Contact {
        iden: mint_iden(),
        name: input.name,
        email: input.email,
        created: now,
        modified: now,
        active: true,
    };
    state.store.write().await.contacts.push(contact.clone());
    Json(contact)
}

async fn update_contact(
    State(state): State<AppState>,
    Path(iden): Path<String>,
    Json(input): Json<ContactUpdate>,
) -> Result<Json<Contact>, Response> {
    let mut store = state.store.write().await;
    let contact = store
        .contacts
        .iter_mut()
        .find(|contact| contact.iden == iden)
        .ok_or_else(not_found)?;
    if let Some(name) = input.name {
        contact.name = name;
    }
    contact.modified = epoch();
    Ok(Json(contact.clone()))
}

async fn delete_contact(
    State(state): State<AppState>,
    Path(iden): Path<String>,
) -> Result<Json<Value>, Response> {
    let mut store = state.store.write().await;
    let position = store
        .contacts
        .iter()
        .position(|contact| contact.iden == iden)
        .ok_or_else(not_found)?;
    store.contacts.remove(position);
    Ok(Json(json!({})))
}

async fn list_devices(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.read().await;
    Json(json!({ "devices": store.devices }))
}

async fn create_device(
    State(state): State<AppState>,
    Json(input): Json<NewDevice>,
) -> Json<Device> {
    let now = epoch();
    let device = Device {
        iden: mint_iden(),
        nickname: input.nickname,
        model: input.model,
        manufacturer: input.manufacturer,
        push_token: input.push_token,
        app_version: input.app_version,
        kind: input.kind,
        active: true,
        pushable: true,
        created: now,
        modified: now,
    };
    state.store.write().await.devices.push(device.clone());
    Json(device)
}

async fn update_device(
    State(state): State<AppState>,
    Path(iden): Path<String>,
    Json(input): Json<DeviceUpdate>,
) -> Result<Json<Device>, Response> {
    let mut store = state.store.write().await;
    let device = store
        .devices
        .iter_mut()
        .find(|device| device.iden == iden)
        .ok_or_else(not_found)?;
    if let Some(nickname) = input.nickname {
        device.nickname = nickname;
    }
    device.modified = epoch();
    Ok(Json(device.clone()))
}

async fn delete_device(
    State(state): State<AppState>,
    Path(iden): Path<String>,
) -> Result<Json<Value>, Response> {
    let mut store = state.store.write().await;
    let position = store
        .devices
        .iter()
        .position(|device| device.iden == iden)
        .ok_or_else(not_found)?;
    store.devices.remove(position);
    Ok(Json(json!({})))
}

async fn get_me() -> Json<Value> {
    Json(json!({
        "iden": "udmock",
        "name": "Mock User",
        "email": "mock@example.com",
        "image_url": "https://static.example.com/mock-user.png",
        "created": 1.5e9,
        "modified": 1.5e9,
    }))
}

async fn list_pushes(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.read().await;
    Json(json!({ "pushes": store.pushes }))
}

async fn create_push(
    State(state): State<AppState>,
    Json(input): Json<Value>,
) -> Result<Json<Value>, Response> {
    let mut push = match input {
        Value::Object(fields) => fields,
        _ => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "Push must be a JSON object.",
            ))
        }
    };
    if let Some(device_iden) = push.remove("device_iden") {
        push.insert("target_device_iden".to_string(), device_iden);
    }
    let now = epoch();
    push.insert("iden".to_string(), json!(mint_iden()));
    push.insert("created".to_string(), json!(now));
    push.insert("modified".to_string(), json!(now));
    push.insert("active".to_string(), json!(true));
    let push = Value::Object(push);
    state.store.write().await.pushes.push(push.clone());
    Ok(Json(push))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": { "type": "invalid_request", "message": message }
        })),
    )
        .into_response()
}

fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Object not found.")
}

fn epoch() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}

fn mint_iden() -> String {
    Uuid::new_v4().simple().to_string()
}
