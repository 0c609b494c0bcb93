//! Request and response types exchanged with the cookie gateway.
//!
//! These types are serialised as JSON over the public HTTP API.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Store endpoint
// ---------------------------------------------------------------------------

/// Request body for `PUT /cookies/:name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRequest {
    /// Arbitrary JSON value to seal into the cookie.
    pub value: serde_json::Value,
    /// Lifetime of the cookie. Omit for a session cookie.
    #[serde(default)]
    pub expires_in_secs: Option<u64>,
}

/// Successful response body for `PUT /cookies/:name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreResponse {
    /// Whether the transport accepted the sealed cookie.
    pub stored: bool,
}

// ---------------------------------------------------------------------------
// Fetch endpoint
// ---------------------------------------------------------------------------

/// Successful response body for `GET /cookies/:name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    /// The value recovered from an authentic cookie.
    pub value: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: String,
}
