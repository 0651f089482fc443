//! Stateless facade over the Pushbullet v2 API.
//!
//! # Design
//! `PushbulletClient` holds the API key and base URL and nothing else; calls
//! are independent of each other and share no mutable state. Three layers
//! live on the one type:
//!
//! - `build_*` methods produce authenticated [`HttpRequest`] values (HTTP
//!   Basic, the API key as both username and password, on every request),
//! - `parse_*` methods interpret [`HttpResponse`] values — status mapping,
//!   envelope array extraction, discriminator skips,
//! - transport-driven operations (`for_each_*`, `fetch_me`, `create_*`,
//!   `update_*`, `delete_*`, `send_push`) run exactly one request through a
//!   [`Transport`] and deliver every outcome through a caller callback.
//!
//! Collection callbacks are `FnMut`, invoked once per emitted element in
//! response order; terminal callbacks are `FnOnce`, so the exactly-once
//! delivery guarantee for writes is checked by the compiler.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::push::{PushContent, PushParams, PushTarget};
use crate::types::{Contact, Device, Me, NewContact, NewDevice, Push};

/// Production API root. [`PushbulletClient::with_base_url`] swaps it out for
/// tests and self-hosted proxies.
pub const DEFAULT_BASE_URL: &str = "https://api.pushbullet.com";

const CONTACTS_PATH: &str = "/v2/contacts";
const DEVICES_PATH: &str = "/v2/devices";
const ME_PATH: &str = "/v2/users/me";
const PUSHES_PATH: &str = "/v2/pushes";

/// Endpoint reserved for requesting file uploads. No operation exercises
/// it; the constant documents the service surface.
pub const UPLOAD_REQUEST_PATH: &str = "/v2/upload-request";

/// Client for the Pushbullet v2 API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network; the transport-driven methods run the round-trip
/// through whatever [`Transport`] the caller supplies.
#[derive(Debug, Clone)]
pub struct PushbulletClient {
    api_key: String,
    base_url: String,
}

impl PushbulletClient {
    /// Client against the production API.
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Client against an alternate API root, e.g. a mock server.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // --- request builders ---

    pub fn build_list_contacts(&self) -> HttpRequest {
        self.get(CONTACTS_PATH)
    }

    pub fn build_list_devices(&self) -> HttpRequest {
        self.get(DEVICES_PATH)
    }

    pub fn build_list_pushes(&self) -> HttpRequest {
        self.get(PUSHES_PATH)
    }

    pub fn build_fetch_me(&self) -> HttpRequest {
        self.get(ME_PATH)
    }

    pub fn build_create_contact(&self, input: &NewContact) -> Result<HttpRequest, ApiError> {
        self.post(CONTACTS_PATH, input)
    }

    pub fn build_update_contact(&self, iden: &str, name: &str) -> Result<HttpRequest, ApiError> {
        self.post(
            &format!("{CONTACTS_PATH}/{iden}"),
            &serde_json::json!({ "name": name }),
        )
    }

    pub fn build_delete_contact(&self, iden: &str) -> HttpRequest {
        self.delete(&format!("{CONTACTS_PATH}/{iden}"))
    }

    pub fn build_create_device(&self, input: &NewDevice) -> Result<HttpRequest, ApiError> {
        self.post(DEVICES_PATH, input)
    }

    pub fn build_update_device(&self, iden: &str, nickname: &str) -> Result<HttpRequest, ApiError> {
        self.post(
            &format!("{DEVICES_PATH}/{iden}"),
            &serde_json::json!({ "nickname": nickname }),
        )
    }

    pub fn build_delete_device(&self, iden: &str) -> HttpRequest {
        self.delete(&format!("{DEVICES_PATH}/{iden}"))
    }

    pub fn build_send_push(
        &self,
        content: &PushContent,
        target: &PushTarget,
    ) -> Result<HttpRequest, ApiError> {
        self.post(PUSHES_PATH, &PushParams::new(content, target))
    }

    // --- response parsers ---

    /// Parse a contact-list response, skipping elements without a `name`.
    pub fn parse_contacts(&self, response: HttpResponse) -> Result<Vec<Contact>, ApiError> {
        Ok(collection_items(&response, "contacts")?
            .iter()
            .filter_map(Contact::from_json)
            .collect())
    }

    /// Parse a device-list response, skipping elements without a `nickname`.
    pub fn parse_devices(&self, response: HttpResponse) -> Result<Vec<Device>, ApiError> {
        Ok(collection_items(&response, "devices")?
            .iter()
            .filter_map(Device::from_json)
            .collect())
    }

    /// Parse a push-history response. With `only_active`, pushes whose
    /// `active` flag is false are dropped entirely.
    pub fn parse_pushes(
        &self,
        response: HttpResponse,
        only_active: bool,
    ) -> Result<Vec<Push>, ApiError> {
        Ok(collection_items(&response, "pushes")?
            .iter()
            .map(Push::from_json)
            .filter(|push| push.active || !only_active)
            .collect())
    }

    pub fn parse_me(&self, response: HttpResponse) -> Result<Me, ApiError> {
        let value = body_object(&response)?;
        Me::from_json(&value).ok_or_else(|| {
            ApiError::DeserializationError("user profile without `email`".to_string())
        })
    }

    pub fn parse_contact(&self, response: HttpResponse) -> Result<Contact, ApiError> {
        let value = body_object(&response)?;
        Contact::from_json(&value)
            .ok_or_else(|| ApiError::DeserializationError("contact without `name`".to_string()))
    }

    pub fn parse_device(&self, response: HttpResponse) -> Result<Device, ApiError> {
        let value = body_object(&response)?;
        Device::from_json(&value)
            .ok_or_else(|| ApiError::DeserializationError("device without `nickname`".to_string()))
    }

    pub fn parse_push(&self, response: HttpResponse) -> Result<Push, ApiError> {
        Ok(Push::from_json(&body_object(&response)?))
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    // --- transport-driven operations ---

    /// Fetch the contact list and invoke `on_item` once per contact, in
    /// response order. Elements without a `name` are skipped. On any
    /// failure `on_item` is invoked exactly once with the error and no
    /// per-item invocations occur.
    pub fn for_each_contact<F>(&self, transport: &impl Transport, mut on_item: F)
    where
        F: FnMut(Result<Contact, ApiError>),
    {
        match self.fetch_collection(transport, self.build_list_contacts(), "contacts") {
            Err(err) => on_item(Err(err)),
            Ok(items) => {
                for item in &items {
                    match Contact::from_json(item) {
                        Some(contact) => on_item(Ok(contact)),
                        None => warn!("skipping contacts element without `name`"),
                    }
                }
            }
        }
    }

    /// Fetch the device list and invoke `on_item` once per device, in
    /// response order. Elements without a `nickname` are skipped.
    pub fn for_each_device<F>(&self, transport: &impl Transport, mut on_item: F)
    where
        F: FnMut(Result<Device, ApiError>),
    {
        match self.fetch_collection(transport, self.build_list_devices(), "devices") {
            Err(err) => on_item(Err(err)),
            Ok(items) => {
                for item in &items {
                    match Device::from_json(item) {
                        Some(device) => on_item(Ok(device)),
                        None => warn!("skipping devices element without `nickname`"),
                    }
                }
            }
        }
    }

    /// Fetch the push history and invoke `on_item` once per push, in
    /// response order. With `only_active`, inactive pushes are skipped.
    pub fn for_each_push<F>(&self, transport: &impl Transport, only_active: bool, mut on_item: F)
    where
        F: FnMut(Result<Push, ApiError>),
    {
        match self.fetch_collection(transport, self.build_list_pushes(), "pushes") {
            Err(err) => on_item(Err(err)),
            Ok(items) => {
                for item in &items {
                    let push = Push::from_json(item);
                    if only_active && !push.active {
                        continue;
                    }
                    on_item(Ok(push));
                }
            }
        }
    }

    /// Fetch the account's own profile. Never cached; every call hits the
    /// server.
    pub fn fetch_me<F>(&self, transport: &impl Transport, on_done: F)
    where
        F: FnOnce(Result<Me, ApiError>),
    {
        let request = self.build_fetch_me();
        debug!("{} {}", request.method, request.path);
        let result = transport
            .execute(request)
            .map_err(ApiError::from)
            .and_then(|response| self.parse_me(response));
        on_done(result);
    }

    pub fn create_contact<F>(&self, transport: &impl Transport, input: &NewContact, on_done: F)
    where
        F: FnOnce(Result<Contact, ApiError>),
    {
        self.dispatch(
            transport,
            self.build_create_contact(input),
            Self::parse_contact,
            on_done,
        );
    }

    pub fn update_contact<F>(&self, transport: &impl Transport, iden: &str, name: &str, on_done: F)
    where
        F: FnOnce(Result<Contact, ApiError>),
    {
        self.dispatch(
            transport,
            self.build_update_contact(iden, name),
            Self::parse_contact,
            on_done,
        );
    }

    pub fn delete_contact<F>(&self, transport: &impl Transport, iden: &str, on_done: F)
    where
        F: FnOnce(Result<(), ApiError>),
    {
        self.dispatch(
            transport,
            Ok(self.build_delete_contact(iden)),
            Self::parse_delete,
            on_done,
        );
    }

    pub fn create_device<F>(&self, transport: &impl Transport, input: &NewDevice, on_done: F)
    where
        F: FnOnce(Result<Device, ApiError>),
    {
        self.dispatch(
            transport,
            self.build_create_device(input),
            Self::parse_device,
            on_done,
        );
    }

    pub fn update_device<F>(
        &self,
        transport: &impl Transport,
        iden: &str,
        nickname: &str,
        on_done: F,
    ) where
        F: FnOnce(Result<Device, ApiError>),
    {
        self.dispatch(
            transport,
            self.build_update_device(iden, nickname),
            Self::parse_device,
            on_done,
        );
    }

    pub fn delete_device<F>(&self, transport: &impl Transport, iden: &str, on_done: F)
    where
        F: FnOnce(Result<(), ApiError>),
    {
        self.dispatch(
            transport,
            Ok(self.build_delete_device(iden)),
            Self::parse_delete,
            on_done,
        );
    }

    /// Submit a push and deliver the created record, as the server reports
    /// it, through `on_done`.
    pub fn send_push<F>(
        &self,
        transport: &impl Transport,
        content: &PushContent,
        target: &PushTarget,
        on_done: F,
    ) where
        F: FnOnce(Result<Push, ApiError>),
    {
        self.dispatch(
            transport,
            self.build_send_push(content, target),
            Self::parse_push,
            on_done,
        );
    }

    // --- internals ---

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers: vec![self.auth_header()],
            body: None,
        }
    }

    fn delete(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}{path}", self.base_url),
            headers: vec![self.auth_header()],
            body: None,
        }
    }

    fn post(&self, path: &str, params: &impl Serialize) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(params)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{path}", self.base_url),
            headers: vec![
                self.auth_header(),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }

    fn auth_header(&self) -> (String, String) {
        let credentials = STANDARD.encode(format!("{0}:{0}", self.api_key));
        ("authorization".to_string(), format!("Basic {credentials}"))
    }

    fn fetch_collection(
        &self,
        transport: &impl Transport,
        request: HttpRequest,
        field: &str,
    ) -> Result<Vec<Value>, ApiError> {
        debug!("{} {}", request.method, request.path);
        let response = transport.execute(request)?;
        collection_items(&response, field)
    }

    fn dispatch<T, F>(
        &self,
        transport: &impl Transport,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&Self, HttpResponse) -> Result<T, ApiError>,
        on_done: F,
    ) where
        F: FnOnce(Result<T, ApiError>),
    {
        let result = request.and_then(|request| {
            debug!("{} {}", request.method, request.path);
            let response = transport.execute(request)?;
            parse(self, response)
        });
        on_done(result);
    }
}

/// Map a response status to `Ok` or the matching `ApiError`. The API
/// answers every successful call, creates included, with 200.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        401 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

/// Parse a successful response body as a JSON value.
fn body_object(response: &HttpResponse) -> Result<Value, ApiError> {
    check_status(response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Extract the named array from a collection envelope.
fn collection_items(response: &HttpResponse, field: &str) -> Result<Vec<Value>, ApiError> {
    let value = body_object(response)?;
    value
        .get(field)
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| ApiError::DeserializationError(format!("response without a `{field}` array")))
}
