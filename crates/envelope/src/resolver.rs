//! Works out which protocol version produced a raw cookie before any
//! decryption is attempted.
//!
//! Current envelopes announce themselves with a visible ASCII signature; legacy
//! envelopes predate it and are recognised by their hex-encoded header instead.

use subtle::ConstantTimeEq;

use crate::crypto::version::{Encoding, EnvelopeConfig, ProtocolVersion, HEADER_LEN};
use crate::error::EnvelopeError;

/// Inputs shorter than this cannot hold any valid header.
pub const MIN_ENVELOPE_LEN: usize = 8;

/// Length of the ASCII signature at the start of current envelopes.
pub const SIGNATURE_LEN: usize = 5;

/// First five characters of every base64url-encoded current envelope.
pub const CURRENT_SIGNATURE: &[u8; SIGNATURE_LEN] = b"MUICA";

const LEGACY_HEADER_HEX_LEN: usize = HEADER_LEN * 2;

/// Resolve the decode parameters for `raw`.
///
/// The decoded header must match the version table exactly, and that version's
/// encoding must be the one used to decode it. An 8-character hex prefix is not
/// taken as legacy on its own.
///
/// # Errors
///
/// Returns [`EnvelopeError::InvalidEnvelope`] for short input, undecodable text,
/// or a header that names no known version.
pub fn resolve(raw: &str) -> Result<EnvelopeConfig, EnvelopeError> {
    let bytes = raw.as_bytes();
    if bytes.len() < MIN_ENVELOPE_LEN {
        return Err(EnvelopeError::InvalidEnvelope("too short"));
    }

    let signed: bool = bytes[..SIGNATURE_LEN]
        .ct_eq(CURRENT_SIGNATURE.as_slice())
        .into();

    let (encoding, version) = if signed {
        // The whole value must decode, not just the header.
        let decoded = Encoding::Base64UrlSafe.decode(raw)?;
        (Encoding::Base64UrlSafe, ProtocolVersion::from_header(&decoded))
    } else {
        let prefix = raw
            .get(..LEGACY_HEADER_HEX_LEN)
            .ok_or(EnvelopeError::InvalidEnvelope("non-ascii header"))?;
        let decoded = Encoding::Hex.decode(prefix)?;
        (Encoding::Hex, ProtocolVersion::from_header(&decoded))
    };

    let config = version
        .ok_or(EnvelopeError::InvalidEnvelope("unknown version"))?
        .config();
    if config.encoding != encoding {
        return Err(EnvelopeError::InvalidEnvelope("encoding does not match version"));
    }
    Ok(config)
}
