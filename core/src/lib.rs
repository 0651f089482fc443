//! Client library for the Pushbullet v2 REST API.
//!
//! # Overview
//! The core builds authenticated `HttpRequest` values and parses
//! `HttpResponse` values without touching the network (host-does-IO
//! pattern). A caller-supplied [`Transport`] executes the actual HTTP
//! round-trip, which keeps every interesting decision — field defaulting,
//! discriminator skips, parameter-mapping construction — deterministic and
//! testable with canned responses.
//!
//! # Design
//! - `PushbulletClient` holds only the API key and base URL; calls share no
//!   mutable state and may be issued concurrently.
//! - Each operation is split into `build_*` (produces an authenticated
//!   request) and `parse_*` (consumes a response), with a transport-driven
//!   layer on top that delivers every outcome through caller callbacks:
//!   once per emitted element for collection reads, exactly once for the
//!   terminal result of everything else.
//! - Records are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod push;
pub mod types;

pub use client::PushbulletClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use push::{PushContent, PushTarget};
pub use types::{Contact, Device, Me, NewContact, NewDevice, Push};
