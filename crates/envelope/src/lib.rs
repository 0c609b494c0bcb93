//! Sealed cookies: arbitrary serde values stored in client-held, versioned,
//! authenticated envelopes.
//!
//! ```
//! use std::sync::Arc;
//! use common::CookieOptions;
//! use envelope::{CookieCodec, MemoryJar, SecretKey};
//!
//! let codec = CookieCodec::new(Arc::new(SecretKey::generate()));
//! let mut jar = MemoryJar::new();
//! codec.store(&mut jar, "cart", &vec![3, 1, 4], &CookieOptions::default()).unwrap();
//!
//! let cart: Option<Vec<u32>> = codec.fetch(&jar, "cart").unwrap();
//! assert_eq!(cart, Some(vec![3, 1, 4]));
//! ```

pub mod codec;
pub mod crypto;
pub mod error;
pub mod resolver;
pub mod transport;

pub use codec::CookieCodec;
pub use crypto::{AesGcmSivCipher, EnvelopeCipher, EnvelopeConfig, KeyError, ProtocolVersion, SecretKey};
pub use error::{EnvelopeError, FetchError, StoreError};
pub use resolver::resolve;
pub use transport::{MemoryJar, Transport};
