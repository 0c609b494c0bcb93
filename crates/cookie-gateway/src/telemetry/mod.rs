//! Telemetry initialisation for the cookie gateway.
//!
//! Structured JSON logs only.
//!
//! # Telemetry invariants
//!
//! - **No key material, cookie values, or plaintext** may appear in any log field.
//! - Fetch failures are logged without their cause.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// Outputs structured JSON logs to stdout at the configured log level;
/// `RUST_LOG` overrides it when set.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise cookie-gateway tracing subscriber: {e}"))
}
