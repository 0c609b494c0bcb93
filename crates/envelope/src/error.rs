//! Error types for envelope resolution, sealing, and the codec boundary.

use thiserror::Error;

/// Failures inside the envelope format and AEAD layer.
///
/// [`crate::CookieCodec::fetch`] absorbs [`EnvelopeError::InvalidEnvelope`] and
/// [`EnvelopeError::InvalidMessage`] into an absent value; callers of the codec
/// only ever see these through [`StoreError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Malformed header, unknown version, or bad outer encoding.
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(&'static str),

    /// Authentication failed: tampered, truncated, or sealed under another key.
    #[error("invalid message")]
    InvalidMessage,

    /// The AEAD or the CSPRNG could not complete the operation.
    #[error("cannot perform operation")]
    CannotPerformOperation,
}

/// Errors surfaced by [`crate::CookieCodec::store`]. Nothing is written when one is returned.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The value has no JSON representation (e.g. a map with non-string keys).
    #[error("cannot serialise value: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Sealing failed; the value is never stored in cleartext instead.
    #[error("cannot seal value")]
    CannotPerformOperation,
}

/// Errors surfaced by [`crate::CookieCodec::fetch`].
///
/// Kept disjoint from the absent case so real integration bugs are not
/// swallowed alongside tampered cookies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The transport returned a non-text value for the cookie.
    #[error("cookie {name:?} has type {found}, expected text")]
    InvalidType { name: String, found: &'static str },
}
