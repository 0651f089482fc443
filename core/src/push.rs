//! Push submission: the four content variants and the delivery target.
//!
//! # Design
//! All four variants travel over one wire shape — a `type` discriminator
//! plus the variant's own keys — so a single flat params struct with
//! skip-if-none fields builds the payload for every variant. The target is
//! an enum rather than a pair of optionals: a parameter mapping can carry
//! `device_iden` or `email`, never both, and a broadcast carries neither.

use serde::Serialize;

/// Content of a push: exactly one of the four wire variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushContent {
    /// `type: "note"` — a title and a text body.
    Note { title: String, body: String },
    /// `type: "link"` — a URL with an optional comment body.
    Link {
        title: String,
        body: Option<String>,
        url: String,
    },
    /// `type: "address"` — a place name and its address or coordinates.
    Address {
        name: String,
        body: Option<String>,
        address: String,
    },
    /// `type: "list"` — a titled checklist of plain-text items.
    List { title: String, items: Vec<String> },
}

/// Where a push is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PushTarget {
    /// Deliver to every device on the account.
    #[default]
    Broadcast,
    /// Deliver to the single device with this `iden`.
    Device(String),
    /// Deliver to a user by email address.
    Email(String),
}

/// Flat parameter mapping for `POST /v2/pushes`. Keys the variant does not
/// use stay `None` and are omitted from the JSON entirely.
#[derive(Debug, Serialize)]
pub(crate) struct PushParams<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_iden: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

impl<'a> PushParams<'a> {
    pub(crate) fn new(content: &'a PushContent, target: &'a PushTarget) -> Self {
        let mut params = Self {
            kind: "",
            title: None,
            body: None,
            url: None,
            name: None,
            address: None,
            items: None,
            device_iden: None,
            email: None,
        };
        match content {
            PushContent::Note { title, body } => {
                params.kind = "note";
                params.title = Some(title);
                params.body = Some(body);
            }
            PushContent::Link { title, body, url } => {
                params.kind = "link";
                params.title = Some(title);
                params.body = body.as_deref();
                params.url = Some(url);
            }
            PushContent::Address {
                name,
                body,
                address,
            } => {
                params.kind = "address";
                params.name = Some(name);
                params.body = body.as_deref();
                params.address = Some(address);
            }
            PushContent::List { title, items } => {
                params.kind = "list";
                params.title = Some(title);
                params.items = Some(items.as_slice());
            }
        }
        match target {
            PushTarget::Broadcast => {}
            PushTarget::Device(iden) => params.device_iden = Some(iden),
            PushTarget::Email(email) => params.email = Some(email),
        }
        params
    }
}
