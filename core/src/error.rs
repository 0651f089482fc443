//! Error types for the Pushbullet API client.
//!
//! # Design
//! `Unauthorized` and `NotFound` get dedicated variants because callers
//! frequently branch on them: a 401 means the API key itself was rejected
//! and no request will succeed until it changes, while a 404 means the
//! addressed resource is gone. All other non-2xx responses land in
//! `HttpError` with the raw status code and body for debugging. Every error
//! reaches the caller through a callback's `Result` slot — nothing in this
//! layer panics or retries.

use std::fmt;

use crate::http::TransportError;

/// Errors delivered by `PushbulletClient` callbacks and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// The server returned 401 — the API key is missing or invalid.
    Unauthorized,

    /// The server returned 404 — the addressed resource does not exist.
    NotFound,

    /// The server returned a non-2xx status other than 401 or 404.
    HttpError { status: u16, body: String },

    /// The response body could not be read as the expected JSON shape.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),

    /// The transport adapter failed before any response was available.
    Transport(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "API key rejected"),
            ApiError::NotFound => write!(f, "resource not found"),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::Transport(msg) => {
                write!(f, "transport failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Transport(err.to_string())
    }
}
