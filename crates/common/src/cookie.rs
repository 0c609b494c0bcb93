//! Transport-facing cookie types.
//!
//! These are passed through the envelope codec untouched: the codec never
//! interprets expiry, scoping, or transport flags.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// `SameSite` attribute of an outgoing cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    /// Attribute value as written in a `Set-Cookie` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Side-band attributes handed to the transport alongside an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieOptions {
    /// Absolute expiry as unix seconds. `None` makes a session cookie.
    pub expires: Option<i64>,
    /// Path scope.
    pub path: String,
    /// Domain scope. `None` keeps the cookie host-only.
    pub domain: Option<String>,
    /// Only send over secure transports.
    pub secure: bool,
    /// Hide from client-side scripts.
    pub http_only: bool,
    /// Cross-site send policy. `None` omits the attribute.
    pub same_site: Option<SameSite>,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            expires: None,
            path: "/".into(),
            domain: None,
            secure: true,
            http_only: true,
            same_site: None,
        }
    }
}

/// Whether `value` can be written as a `Path` or `Domain` attribute without
/// ending the attribute early or smuggling in another one.
///
/// Rejects `;`, whitespace, and control characters.
pub fn is_valid_attribute_value(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c != ';' && !c.is_whitespace() && !c.is_control())
}

/// A cookie value exactly as the transport delivered it.
///
/// Only [`RawCookie::Text`] can hold an envelope. The other shapes exist because
/// real transports can produce them (e.g. `name[]=a; name[]=b` collapsing into a
/// list), and receiving one is a contract violation rather than a bad envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCookie {
    Text(String),
    Binary(Bytes),
    List(Vec<String>),
}

impl RawCookie {
    /// Short name of the variant, safe to put in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            RawCookie::Text(_) => "text",
            RawCookie::Binary(_) => "binary",
            RawCookie::List(_) => "list",
        }
    }
}
