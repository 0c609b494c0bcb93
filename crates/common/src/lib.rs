//! Common types, protocol definitions, and errors shared across `sealed-cookie` crates.

pub mod cookie;
pub mod error;
pub mod protocol;

pub use cookie::{CookieOptions, RawCookie, SameSite};
pub use error::ServiceError;
