//! [`MemoryJar`]: in-process cookie storage.

use std::collections::HashMap;

use common::{CookieOptions, RawCookie};

use super::Transport;

/// A single stored cookie and the attributes it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCookie {
    pub value: RawCookie,
    pub options: CookieOptions,
}

/// `HashMap`-backed [`Transport`].
///
/// Useful for embedding the codec where there is no HTTP exchange, and for
/// tests that need to inspect or corrupt what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryJar {
    cookies: HashMap<String, StoredCookie>,
}

impl MemoryJar {
    /// Create a new, empty [`MemoryJar`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a raw value under `name`, bypassing the codec.
    pub fn insert_raw(&mut self, name: impl Into<String>, value: RawCookie) {
        self.cookies.insert(
            name.into(),
            StoredCookie {
                value,
                options: CookieOptions::default(),
            },
        );
    }

    /// Look up the full stored entry, attributes included.
    pub fn entry(&self, name: &str) -> Option<&StoredCookie> {
        self.cookies.get(name)
    }

    /// Remove a cookie, returning what was stored.
    pub fn remove(&mut self, name: &str) -> Option<StoredCookie> {
        self.cookies.remove(name)
    }

    /// Number of stored cookies.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Return `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl Transport for MemoryJar {
    fn get(&self, name: &str) -> Option<RawCookie> {
        self.cookies.get(name).map(|c| c.value.clone())
    }

    fn set(&mut self, name: &str, value: &str, options: &CookieOptions) -> bool {
        if name.is_empty() {
            return false;
        }
        self.cookies.insert(
            name.to_owned(),
            StoredCookie {
                value: RawCookie::Text(value.to_owned()),
                options: options.clone(),
            },
        );
        true
    }
}
