//! Envelope sealing: the version table, the key type, and the AEAD seam.
//!
//! # Envelope format
//!
//! ```text
//! current: base64url-no-pad( 31 42 02 00 | nonce(12) | ciphertext+tag )   starts with "MUICA"
//! legacy:  hex(              31 42 01 00 | nonce(12) | ciphertext+tag )   starts with "31420100"
//! ```
//!
//! The four header bytes are bound to the ciphertext as associated data.

pub mod cipher;
pub mod key;
pub mod version;

pub use cipher::AesGcmSivCipher;
pub use key::{KeyError, SecretKey, KEY_LEN};
pub use version::{Encoding, EnvelopeConfig, ProtocolVersion};

use zeroize::Zeroizing;

use crate::error::EnvelopeError;

/// Authenticated encryption as the codec consumes it.
#[cfg_attr(test, mockall::automock)]
pub trait EnvelopeCipher {
    /// Seal `plaintext` into envelope text.
    ///
    /// Must fail closed: an error means nothing usable was produced.
    fn encrypt(&self, plaintext: &[u8], key: &SecretKey) -> Result<String, EnvelopeError>;

    /// Authenticate and open envelope text decoded per `config`.
    fn decrypt(
        &self,
        envelope: &str,
        key: &SecretKey,
        config: &EnvelopeConfig,
    ) -> Result<Zeroizing<Vec<u8>>, EnvelopeError>;
}
