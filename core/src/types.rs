//! Domain records for the Pushbullet v2 API.
//!
//! # Design
//! Records are produced only by parsing server JSON — the library never
//! constructs or mutates them on its own, and callers keep whatever they
//! want to keep. Parsing is deliberately lenient: every field access is
//! get-with-default or get-returns-optional, so a response missing optional
//! fields yields defaults (empty string, `false`, `0.0`) instead of a
//! failure. A record is produced at all only when its discriminating field
//! is present — `name` for contacts, `nickname` for devices, `email` for
//! the user profile. Pushes carry no discriminator and always parse.
//!
//! The `New*` payload types mirror the write side: optional fields that are
//! not set are absent from the serialized JSON entirely, never `null`.

use serde::Serialize;
use serde_json::Value;

/// A contact from the account's contact list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Contact {
    /// Server identifier (wire `iden`).
    pub iden: String,
    pub name: String,
    pub email: String,
}

impl Contact {
    /// Parse one element of a `contacts` array.
    ///
    /// Returns `None` when `name` is absent, which collection parsing
    /// treats as "skip this element".
    pub fn from_json(value: &Value) -> Option<Self> {
        let name = opt_string(value, "name")?;
        Some(Self {
            iden: string_or_empty(value, "iden"),
            name,
            email: string_or_empty(value, "email"),
        })
    }
}

/// A device registered to the account.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iden: Option<String>,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Wire `type`, e.g. `"android"` or `"stream"`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<i64>,
    pub active: bool,
    pub pushable: bool,
}

impl Device {
    /// Parse one element of a `devices` array.
    ///
    /// Returns `None` when `nickname` is absent, which collection parsing
    /// treats as "skip this element".
    pub fn from_json(value: &Value) -> Option<Self> {
        let nickname = opt_string(value, "nickname")?;
        Some(Self {
            iden: opt_string(value, "iden"),
            nickname,
            push_token: opt_string(value, "push_token"),
            manufacturer: opt_string(value, "manufacturer"),
            model: opt_string(value, "model"),
            kind: opt_string(value, "type"),
            app_version: opt_i64(value, "app_version"),
            active: bool_or_false(value, "active"),
            pushable: bool_or_false(value, "pushable"),
        })
    }
}

/// The account's own user profile (`users/me`).
///
/// Fetched fresh on every call, never cached by the library.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Me {
    pub iden: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

impl Me {
    /// Parse a `users/me` response body. Returns `None` when `email` is
    /// absent — a profile body without it is not a profile at all.
    pub fn from_json(value: &Value) -> Option<Self> {
        let email = opt_string(value, "email")?;
        Some(Self {
            iden: string_or_empty(value, "iden"),
            name: string_or_empty(value, "name"),
            email,
            image_url: string_or_empty(value, "image_url"),
        })
    }
}

/// One entry of the push history, or the push created by a submission.
///
/// Which optional fields are populated depends on `kind`: notes carry
/// `title`/`body`, links add `url`, addresses use `name`/`address`, list
/// pushes keep their raw sub-items in `items`, file pushes fill the
/// `file_*` fields.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Push {
    pub iden: String,
    /// Wire `type`: `"note"`, `"link"`, `"address"`, `"list"` or `"file"`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_device_iden: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_email: Option<String>,
    /// Label of an address push (wire `name`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    /// Raw sub-items of a list push, deliberately left unparsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Value>>,
    pub created: f64,
    pub modified: f64,
    pub active: bool,
}

impl Push {
    /// Parse one element of a `pushes` array or a push-creation response.
    ///
    /// Pushes have no discriminating field; anything missing defaults.
    pub fn from_json(value: &Value) -> Self {
        Self {
            iden: string_or_empty(value, "iden"),
            kind: opt_string(value, "type"),
            title: opt_string(value, "title"),
            body: opt_string(value, "body"),
            url: opt_string(value, "url"),
            target_device_iden: opt_string(value, "target_device_iden"),
            sender_email: opt_string(value, "sender_email"),
            receiver_email: opt_string(value, "receiver_email"),
            name: opt_string(value, "name"),
            address: opt_string(value, "address"),
            file_name: opt_string(value, "file_name"),
            file_type: opt_string(value, "file_type"),
            file_url: opt_string(value, "file_url"),
            items: value.get("items").and_then(Value::as_array).cloned(),
            created: f64_or_zero(value, "created"),
            modified: f64_or_zero(value, "modified"),
            active: bool_or_false(value, "active"),
        }
    }
}

/// Request payload for creating a contact.
#[derive(Debug, Clone, Serialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
}

/// Request payload for registering a device. Only the fields actually set
/// appear in the JSON; omitted optionals are absent, not null.
#[derive(Debug, Clone, Serialize)]
pub struct NewDevice {
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
}

/// Read a string field, stringifying scalar non-strings (the wire
/// occasionally carries numbers where strings are documented). Arrays,
/// objects and null do not stringify.
fn opt_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_or_empty(value: &Value, key: &str) -> String {
    opt_string(value, key).unwrap_or_default()
}

fn bool_or_false(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn f64_or_zero(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn opt_i64(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(Value::as_i64)
}
