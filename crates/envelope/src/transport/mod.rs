//! The request/response side channel envelopes travel over.
//!
//! The codec treats a transport as opaque key-value storage with side-band
//! attributes. It never interprets expiry, scoping, or transport flags.

pub mod memory;

pub use memory::MemoryJar;

use common::{CookieOptions, RawCookie};

/// Named cookie storage as seen by the codec.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Return the raw value stored under `name`, if any.
    fn get(&self, name: &str) -> Option<RawCookie>;

    /// Write `value` under `name` with the given attributes.
    ///
    /// Returns whether the transport accepted the write.
    fn set(&mut self, name: &str, value: &str, options: &CookieOptions) -> bool;
}
