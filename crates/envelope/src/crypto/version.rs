//! Protocol version table: header bytes, text encodings, and decode parameters.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::EnvelopeError;

/// Byte length of the version header at the start of every decoded envelope.
pub const HEADER_LEN: usize = 4;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the AES-GCM-SIV authentication tag.
pub const TAG_LEN: usize = 16;

const CURRENT_HEADER: [u8; HEADER_LEN] = [0x31, 0x42, 0x02, 0x00];
const LEGACY_HEADER: [u8; HEADER_LEN] = [0x31, 0x42, 0x01, 0x00];

/// Outer text encoding wrapped around `[header][nonce][ciphertext+tag]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// URL-safe base64 without padding.
    Base64UrlSafe,
    /// Lowercase hex.
    Hex,
}

impl Encoding {
    /// Encode raw envelope bytes as text.
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Base64UrlSafe => URL_SAFE_NO_PAD.encode(bytes),
            Encoding::Hex => hex::encode(bytes),
        }
    }

    /// Decode envelope text into a buffer that is wiped when dropped.
    ///
    /// The buffer is sized up front so the decoder never reallocates and leaves
    /// an unwiped copy behind; partial output is wiped on the error path too.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidEnvelope`] on a bad alphabet or length.
    pub fn decode(self, text: &str) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
        match self {
            Encoding::Base64UrlSafe => {
                let mut buf = Zeroizing::new(Vec::with_capacity(
                    base64::decoded_len_estimate(text.len()),
                ));
                URL_SAFE_NO_PAD
                    .decode_vec(text, &mut buf)
                    .map_err(|_| EnvelopeError::InvalidEnvelope("bad base64 encoding"))?;
                Ok(buf)
            }
            Encoding::Hex => {
                if text.len() % 2 != 0 {
                    return Err(EnvelopeError::InvalidEnvelope("odd hex length"));
                }
                let mut buf = Zeroizing::new(vec![0u8; text.len() / 2]);
                hex::decode_to_slice(text, &mut buf[..])
                    .map_err(|_| EnvelopeError::InvalidEnvelope("bad hex encoding"))?;
                Ok(buf)
            }
        }
    }
}

/// Known envelope protocol versions.
///
/// `Current` envelopes are written by default. `Legacy` envelopes are still
/// accepted on read so that cookies issued before the ASCII signature existed
/// keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    Current,
    Legacy,
}

impl ProtocolVersion {
    /// Every version this build can read.
    pub const ALL: [ProtocolVersion; 2] = [ProtocolVersion::Current, ProtocolVersion::Legacy];

    /// Header bytes written at the start of every envelope of this version.
    pub const fn header(self) -> [u8; HEADER_LEN] {
        match self {
            ProtocolVersion::Current => CURRENT_HEADER,
            ProtocolVersion::Legacy => LEGACY_HEADER,
        }
    }

    /// Look up the version whose header exactly matches the first
    /// [`HEADER_LEN`] bytes of `bytes`.
    ///
    /// Returns `None` for short input or an unrecognised header.
    pub fn from_header(bytes: &[u8]) -> Option<Self> {
        let header = bytes.get(..HEADER_LEN)?;
        Self::ALL
            .into_iter()
            .find(|v| bool::from(v.header().as_slice().ct_eq(header)))
    }

    /// Decode parameters for this version.
    pub const fn config(self) -> EnvelopeConfig {
        let encoding = match self {
            ProtocolVersion::Current => Encoding::Base64UrlSafe,
            ProtocolVersion::Legacy => Encoding::Hex,
        };
        EnvelopeConfig {
            version: self,
            encoding,
            header_len: HEADER_LEN,
            shortest_len: HEADER_LEN + NONCE_LEN + TAG_LEN,
        }
    }
}

/// Parameters needed to decode one envelope, derived from its header alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeConfig {
    /// Version that produced the envelope.
    pub version: ProtocolVersion,
    /// Outer text encoding of the envelope.
    pub encoding: Encoding,
    /// Length of the header in decoded bytes.
    pub header_len: usize,
    /// Smallest decoded length that can hold a header, nonce, and tag.
    pub shortest_len: usize,
}
