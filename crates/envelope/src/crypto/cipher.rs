//! AES-256-GCM-SIV sealing and opening of whole envelopes.
//!
//! **Algorithm choice:** AES-256-GCM-SIV (RFC 8452) is nonce-misuse-resistant,
//! so a repeated random nonce degrades to revealing equal plaintexts rather than
//! breaking authentication.

use aes_gcm_siv::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng, Payload},
    Aes256GcmSiv, Key, Nonce,
};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::key::SecretKey;
use super::version::{EnvelopeConfig, ProtocolVersion, HEADER_LEN, NONCE_LEN};
use super::EnvelopeCipher;
use crate::error::EnvelopeError;

/// [`EnvelopeCipher`] backed by AES-256-GCM-SIV.
///
/// Writes envelopes of a single [`ProtocolVersion`]; opens any version the
/// resolver hands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AesGcmSivCipher {
    version: ProtocolVersion,
}

impl AesGcmSivCipher {
    /// Cipher that writes current-version envelopes.
    pub fn new() -> Self {
        Self {
            version: ProtocolVersion::Current,
        }
    }

    /// Cipher that writes legacy hex envelopes, for producing cookies that
    /// older readers still understand.
    pub fn legacy() -> Self {
        Self {
            version: ProtocolVersion::Legacy,
        }
    }

    /// Version of the envelopes this cipher writes.
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }
}

impl Default for AesGcmSivCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvelopeCipher for AesGcmSivCipher {
    /// A random 96-bit nonce is drawn per call. CSPRNG or AEAD failure yields
    /// [`EnvelopeError::CannotPerformOperation`].
    fn encrypt(&self, plaintext: &[u8], key: &SecretKey) -> Result<String, EnvelopeError> {
        let cipher = build_cipher(key);
        let header = self.version.header();

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|_| EnvelopeError::CannotPerformOperation)?;

        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce_bytes),
                Payload {
                    msg: plaintext,
                    aad: &header,
                },
            )
            .map_err(|_| EnvelopeError::CannotPerformOperation)?;

        let mut body = Vec::with_capacity(HEADER_LEN + NONCE_LEN + ciphertext.len());
        body.extend_from_slice(&header);
        body.extend_from_slice(&nonce_bytes);
        body.extend_from_slice(&ciphertext);

        Ok(self.version.config().encoding.encode(&body))
    }

    /// Every failure after decoding is reported as [`EnvelopeError::InvalidMessage`]
    /// so a short body, a header mismatch, and a bad tag look the same.
    fn decrypt(
        &self,
        envelope: &str,
        key: &SecretKey,
        config: &EnvelopeConfig,
    ) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
        let decoded = config.encoding.decode(envelope)?;
        if decoded.len() < config.shortest_len {
            return Err(EnvelopeError::InvalidMessage);
        }

        let (header, rest) = decoded.split_at(config.header_len);
        let expected = config.version.header();
        if !bool::from(header.ct_eq(expected.as_slice())) {
            return Err(EnvelopeError::InvalidMessage);
        }
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        build_cipher(key)
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: header,
                },
            )
            .map(Zeroizing::new)
            .map_err(|_| EnvelopeError::InvalidMessage)
    }
}

fn build_cipher(key: &SecretKey) -> Aes256GcmSiv {
    Aes256GcmSiv::new(Key::<Aes256GcmSiv>::from_slice(key.as_bytes()))
}
