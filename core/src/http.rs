//! HTTP transport types for the adapter-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network — a [`Transport`] implementation supplied by the
//! caller is responsible for executing the actual I/O. This separation keeps
//! the core deterministic and easy to test: a canned-response transport is
//! enough to exercise every callback path.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved into
//! whatever runtime the transport lives on without lifetime concerns.

use std::fmt;

/// HTTP method for a request. The API updates resources via POST, so the
/// set is exactly GET/POST/DELETE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Delete => write!(f, "DELETE"),
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `PushbulletClient::build_*` methods. Every request carries an
/// `authorization` header; POST requests additionally carry a JSON body and
/// its `content-type` header.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then passed
/// to `PushbulletClient::parse_*` methods for interpretation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Opaque failure raised by a [`Transport`] implementation.
///
/// The client never inspects the message; it is forwarded verbatim to the
/// caller's callback as [`crate::ApiError::Transport`].
#[derive(Debug)]
pub struct TransportError(String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TransportError {}

/// Executes one `HttpRequest` and returns the raw `HttpResponse`.
///
/// Implementations own everything the client deliberately does not:
/// connection handling, TLS, timeouts, cancellation, retries. A non-2xx
/// status is data, not an error — return the response and let the client
/// interpret the status code. Return `Err` only when no response was
/// obtained at all.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
