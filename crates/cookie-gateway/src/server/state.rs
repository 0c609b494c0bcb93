//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use common::CookieOptions;
use envelope::{CookieCodec, SecretKey};

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-backed) so that Axum can clone the
/// state for each request without copying the key.
#[derive(Clone)]
pub struct AppState {
    /// Codec bound to the gateway's sealing key.
    pub codec: CookieCodec,
    /// Attributes applied to every issued cookie.
    pub cookie_defaults: Arc<CookieOptions>,
}

impl AppState {
    /// Create a new [`AppState`] from a codec and cookie defaults.
    pub fn new(codec: CookieCodec, cookie_defaults: CookieOptions) -> Self {
        Self {
            codec,
            cookie_defaults: Arc::new(cookie_defaults),
        }
    }

    /// Cookie attributes for a write, with expiry `expires_in_secs` from `now`.
    pub fn options_for(&self, now: i64, expires_in_secs: Option<u64>) -> CookieOptions {
        let expires = expires_in_secs.map(|secs| {
            now.saturating_add(i64::try_from(secs).unwrap_or(i64::MAX))
        });
        CookieOptions {
            expires,
            ..(*self.cookie_defaults).clone()
        }
    }
}

impl Default for AppState {
    /// Creates an [`AppState`] with a random key and default attributes, suitable for tests.
    fn default() -> Self {
        Self::new(
            CookieCodec::new(Arc::new(SecretKey::generate())),
            CookieOptions::default(),
        )
    }
}
