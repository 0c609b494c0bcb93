//! Configuration loading and validation for the cookie gateway.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use common::{cookie::is_valid_attribute_value, CookieOptions, SameSite};
use envelope::SecretKey;
use serde::Deserialize;

/// Validated gateway configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// 32-byte sealing key as unpadded URL-safe base64. **Required.**
    pub encryption_key: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// `Path` attribute of issued cookies.
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,

    /// `Domain` attribute of issued cookies. Empty keeps them host-only.
    #[serde(default)]
    pub cookie_domain: String,

    /// Whether issued cookies carry `Secure`.
    #[serde(default = "default_true")]
    pub cookie_secure: bool,

    /// Whether issued cookies carry `HttpOnly`.
    #[serde(default = "default_true")]
    pub cookie_http_only: bool,

    /// `SameSite` attribute of issued cookies.
    #[serde(default = "default_same_site")]
    pub cookie_same_site: SameSite,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_cookie_path() -> String {
    "/".into()
}
fn default_true() -> bool {
    true
}
fn default_same_site() -> SameSite {
    SameSite::Lax
}
fn default_log_level() -> String {
    "info".into()
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("encryption_key", &"[REDACTED]")
            .field("listen_port", &self.listen_port)
            .field("cookie_path", &self.cookie_path)
            .field("cookie_domain", &self.cookie_domain)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_http_only", &self.cookie_http_only)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Decode the configured sealing key.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENCRYPTION_KEY` is not 32 bytes of base64url.
    pub fn secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_base64(&self.encryption_key).context("ENCRYPTION_KEY is invalid")
    }

    /// Attributes applied to every cookie the gateway issues, before expiry.
    pub fn cookie_defaults(&self) -> CookieOptions {
        CookieOptions {
            expires: None,
            path: self.cookie_path.clone(),
            domain: Some(self.cookie_domain.trim().to_owned()).filter(|d| !d.is_empty()),
            secure: self.cookie_secure,
            http_only: self.cookie_http_only,
            same_site: Some(self.cookie_same_site),
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.encryption_key.trim().is_empty() {
            anyhow::bail!("ENCRYPTION_KEY is required and must not be empty");
        }
        self.secret_key()?;

        if !self.cookie_path.starts_with('/') {
            anyhow::bail!("COOKIE_PATH must start with '/'");
        }
        if !is_valid_attribute_value(&self.cookie_path) {
            anyhow::bail!("COOKIE_PATH must not contain ';', whitespace, or control characters");
        }
        let domain = self.cookie_domain.trim();
        if !domain.is_empty() && !is_valid_attribute_value(domain) {
            anyhow::bail!("COOKIE_DOMAIN must not contain ';', whitespace, or control characters");
        }
        if self.cookie_same_site == SameSite::None && !self.cookie_secure {
            anyhow::bail!("COOKIE_SAME_SITE=none requires COOKIE_SECURE=true");
        }
        Ok(())
    }
}
