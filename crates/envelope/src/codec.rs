//! [`CookieCodec`]: seal values into named cookies and open them again.
//!
//! `store` fails loudly: every serialisation or sealing failure reaches the
//! caller and nothing is written. `fetch` fails quietly: a missing, malformed,
//! legacy-but-unknown, tampered, or foreign-key cookie all come back as `None`,
//! and none of those causes is distinguishable from the outside.

use std::sync::Arc;

use common::{CookieOptions, RawCookie};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::crypto::{AesGcmSivCipher, EnvelopeCipher, SecretKey};
use crate::error::{FetchError, StoreError};
use crate::resolver::resolve;
use crate::transport::Transport;

/// Stateless envelope codec bound to one key.
///
/// Cheap to clone and safe to share across threads; the key is held behind an
/// `Arc` and never mutated.
#[derive(Debug, Clone)]
pub struct CookieCodec<C = AesGcmSivCipher> {
    key: Arc<SecretKey>,
    cipher: C,
}

impl CookieCodec {
    /// Codec that writes current-version AES-256-GCM-SIV envelopes.
    pub fn new(key: Arc<SecretKey>) -> Self {
        Self::with_cipher(key, AesGcmSivCipher::new())
    }
}

impl<C: EnvelopeCipher> CookieCodec<C> {
    /// Codec using a specific cipher.
    pub fn with_cipher(key: Arc<SecretKey>, cipher: C) -> Self {
        Self { key, cipher }
    }

    /// Serialise `value`, seal it, and hand the envelope to `jar`.
    ///
    /// Returns whatever the transport reports for the write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if `value` has no JSON form, or
    /// [`StoreError::CannotPerformOperation`] if sealing fails. The transport is
    /// not touched in either case.
    pub fn store<T, J>(
        &self,
        jar: &mut J,
        name: &str,
        value: &T,
        options: &CookieOptions,
    ) -> Result<bool, StoreError>
    where
        T: Serialize + ?Sized,
        J: Transport + ?Sized,
    {
        let plaintext = Zeroizing::new(serde_json::to_vec(value)?);
        let envelope = self.cipher.encrypt(&plaintext, &self.key).map_err(|e| {
            warn!(cookie = name, error = %e, "failed to seal cookie");
            StoreError::CannotPerformOperation
        })?;

        let stored = jar.set(name, &envelope, options);
        debug!(cookie = name, stored, "sealed cookie handed to transport");
        Ok(stored)
    }

    /// Read the cookie `name` from `jar` and recover the value sealed in it.
    ///
    /// `Ok(None)` covers a missing cookie and every format or authenticity
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidType`] if the transport hands back anything
    /// other than text.
    pub fn fetch<T, J>(&self, jar: &J, name: &str) -> Result<Option<T>, FetchError>
    where
        T: DeserializeOwned,
        J: Transport + ?Sized,
    {
        let raw = match jar.get(name) {
            None => return Ok(None),
            Some(RawCookie::Text(raw)) => raw,
            Some(other) => {
                return Err(FetchError::InvalidType {
                    name: name.to_owned(),
                    found: other.kind(),
                })
            }
        };

        let value = self.open(&raw);
        if value.is_none() {
            // One message for every cause.
            debug!(cookie = name, "discarding unreadable cookie");
        }
        Ok(value)
    }

    fn open<T: DeserializeOwned>(&self, raw: &str) -> Option<T> {
        let config = resolve(raw).ok()?;
        let plaintext = self.cipher.decrypt(raw, &self.key, &config).ok()?;
        serde_json::from_slice(&plaintext).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::version::{Encoding, ProtocolVersion, HEADER_LEN};
    use crate::crypto::MockEnvelopeCipher;
    use crate::error::EnvelopeError;
    use crate::transport::{MemoryJar, MockTransport};
    use mockall::predicate::eq;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Session {
        user_id: u64,
        roles: Vec<String>,
        theme: Option<String>,
    }

    fn session() -> Session {
        Session {
            user_id: 42,
            roles: vec!["admin".into(), "billing".into()],
            theme: None,
        }
    }

    fn codec() -> CookieCodec {
        CookieCodec::new(Arc::new(SecretKey::generate()))
    }

    fn stored_text(jar: &MemoryJar, name: &str) -> String {
        match jar.get(name) {
            Some(RawCookie::Text(s)) => s,
            other => panic!("expected text cookie, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_struct() {
        let codec = codec();
        let mut jar = MemoryJar::new();
        assert!(codec
            .store(&mut jar, "session", &session(), &CookieOptions::default())
            .unwrap());
        let back: Option<Session> = codec.fetch(&jar, "session").unwrap();
        assert_eq!(back, Some(session()));
    }

    #[test]
    fn round_trip_json_shapes() {
        let codec = codec();
        let mut jar = MemoryJar::new();
        let values = [
            json!(null),
            json!(true),
            json!(-17),
            json!(3.5),
            json!("ünïcødé"),
            json!([1, "two", {"three": 3}]),
            json!({"nested": {"deep": [null, false]}}),
        ];
        for value in values {
            codec
                .store(&mut jar, "v", &value, &CookieOptions::default())
                .unwrap();
            let back: Option<Value> = codec.fetch(&jar, "v").unwrap();
            assert_eq!(back.as_ref(), Some(&value));
        }
    }

    #[test]
    fn stored_envelope_is_opaque() {
        let codec = codec();
        let mut jar = MemoryJar::new();
        codec
            .store(&mut jar, "session", &session(), &CookieOptions::default())
            .unwrap();
        let raw = stored_text(&jar, "session");
        assert!(raw.starts_with("MUICA"));
        assert!(!raw.contains("admin"));
    }

    #[test]
    fn options_pass_through_untouched() {
        let codec = codec();
        let mut jar = MemoryJar::new();
        let opts = CookieOptions {
            expires: Some(2_000_000_000),
            path: "/account".into(),
            domain: Some("example.com".into()),
            secure: false,
            http_only: false,
            same_site: Some(common::SameSite::Strict),
        };
        codec.store(&mut jar, "s", &1u8, &opts).unwrap();
        assert_eq!(jar.entry("s").unwrap().options, opts);
    }

    #[test]
    fn missing_cookie_is_absent() {
        let back: Option<Value> = codec().fetch(&MemoryJar::new(), "nope").unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn every_bit_flip_is_absent() {
        let codec = codec();
        let mut jar = MemoryJar::new();
        codec
            .store(&mut jar, "s", &session(), &CookieOptions::default())
            .unwrap();
        let decoded = Encoding::Base64UrlSafe
            .decode(&stored_text(&jar, "s"))
            .unwrap();

        for byte in 0..decoded.len() {
            for bit in 0..8 {
                let mut tampered = decoded.to_vec();
                tampered[byte] ^= 1 << bit;
                let mut bad = MemoryJar::new();
                bad.insert_raw(
                    "s",
                    RawCookie::Text(Encoding::Base64UrlSafe.encode(&tampered)),
                );
                let back: Option<Session> = codec.fetch(&bad, "s").unwrap();
                assert!(back.is_none(), "flip at byte {byte} bit {bit} accepted");
            }
        }
    }

    #[test]
    fn wrong_key_is_absent() {
        let mut jar = MemoryJar::new();
        codec()
            .store(&mut jar, "s", &session(), &CookieOptions::default())
            .unwrap();
        let back: Option<Session> = codec().fetch(&jar, "s").unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn legacy_envelope_decodes() {
        let key = Arc::new(SecretKey::generate());
        let legacy = CookieCodec::with_cipher(key.clone(), AesGcmSivCipher::legacy());
        let mut jar = MemoryJar::new();
        legacy
            .store(&mut jar, "s", &session(), &CookieOptions::default())
            .unwrap();
        assert!(stored_text(&jar, "s").starts_with("31420100"));

        let back: Option<Session> = CookieCodec::new(key).fetch(&jar, "s").unwrap();
        assert_eq!(back, Some(session()));
    }

    #[test]
    fn legacy_envelope_with_bad_header_is_absent() {
        let key = Arc::new(SecretKey::generate());
        let legacy = CookieCodec::with_cipher(key.clone(), AesGcmSivCipher::legacy());
        let mut jar = MemoryJar::new();
        legacy
            .store(&mut jar, "s", &session(), &CookieOptions::default())
            .unwrap();
        let raw = stored_text(&jar, "s");
        let codec = CookieCodec::new(key);

        for prefix in ["31420300", "zz420100", "31420200"] {
            let mut bad = MemoryJar::new();
            bad.insert_raw("s", RawCookie::Text(format!("{prefix}{}", &raw[8..])));
            let back: Option<Session> = codec.fetch(&bad, "s").unwrap();
            assert!(back.is_none(), "prefix {prefix} accepted");
        }
    }

    #[test]
    fn short_input_never_reaches_the_cipher() {
        let mut cipher = MockEnvelopeCipher::new();
        cipher.expect_decrypt().never();
        let codec = CookieCodec::with_cipher(Arc::new(SecretKey::generate()), cipher);

        for raw in ["", "MUICA", "3142010"] {
            let mut jar = MemoryJar::new();
            jar.insert_raw("s", RawCookie::Text(raw.into()));
            let back: Option<Value> = codec.fetch(&jar, "s").unwrap();
            assert!(back.is_none());
        }
    }

    #[test]
    fn non_text_cookie_is_invalid_type() {
        let codec = codec();
        let mut jar = MemoryJar::new();
        jar.insert_raw("s", RawCookie::List(vec!["a".into()]));
        let err = codec.fetch::<Value, _>(&jar, "s").unwrap_err();
        assert_eq!(
            err,
            FetchError::InvalidType {
                name: "s".into(),
                found: "list"
            }
        );
    }

    #[test]
    fn binary_from_transport_is_invalid_type() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .with(eq("s"))
            .times(1)
            .returning(|_| Some(RawCookie::Binary(bytes_of(b"MUICAAAA"))));
        let err = codec().fetch::<Value, _>(&transport, "s").unwrap_err();
        assert!(matches!(err, FetchError::InvalidType { found: "binary", .. }));
    }

    fn bytes_of(b: &'static [u8]) -> bytes::Bytes {
        bytes::Bytes::from_static(b)
    }

    #[test]
    fn fetch_is_idempotent() {
        let codec = codec();
        let mut jar = MemoryJar::new();
        codec
            .store(&mut jar, "s", &session(), &CookieOptions::default())
            .unwrap();
        let before = jar.entry("s").cloned();

        let first: Option<Session> = codec.fetch(&jar, "s").unwrap();
        let second: Option<Session> = codec.fetch(&jar, "s").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Some(session()));
        assert_eq!(jar.entry("s").cloned(), before);
    }

    #[test]
    fn authentic_but_wrong_shape_is_absent() {
        let codec = codec();
        let mut jar = MemoryJar::new();
        codec
            .store(&mut jar, "s", &"just a string", &CookieOptions::default())
            .unwrap();
        let back: Option<Session> = codec.fetch(&jar, "s").unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn unserialisable_value_is_rejected_before_transport() {
        let mut transport = MockTransport::new();
        transport.expect_set().never();
        let mut value = HashMap::new();
        value.insert(vec![1u8], "non-string map keys have no JSON form");
        let err = codec()
            .store(&mut transport, "s", &value, &CookieOptions::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn cipher_failure_stores_nothing() {
        let mut cipher = MockEnvelopeCipher::new();
        cipher
            .expect_encrypt()
            .times(1)
            .returning(|_, _| Err(EnvelopeError::CannotPerformOperation));
        let mut transport = MockTransport::new();
        transport.expect_set().never();

        let codec = CookieCodec::with_cipher(Arc::new(SecretKey::generate()), cipher);
        let err = codec
            .store(&mut transport, "s", &session(), &CookieOptions::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::CannotPerformOperation));
    }

    #[test]
    fn store_reports_transport_result() {
        let mut transport = MockTransport::new();
        transport
            .expect_set()
            .withf(|name, value, opts| {
                name == "s" && value.starts_with("MUICA") && opts.path == "/"
            })
            .times(1)
            .returning(|_, _, _| false);
        let stored = codec()
            .store(&mut transport, "s", &session(), &CookieOptions::default())
            .unwrap();
        assert!(!stored);
    }

    #[test]
    fn relabelled_legacy_header_is_absent() {
        // Swap a legacy header for the current one and re-encode as base64.
        let key = Arc::new(SecretKey::generate());
        let mut jar = MemoryJar::new();
        CookieCodec::with_cipher(key.clone(), AesGcmSivCipher::legacy())
            .store(&mut jar, "s", &session(), &CookieOptions::default())
            .unwrap();
        let mut body = Encoding::Hex.decode(&stored_text(&jar, "s")).unwrap().to_vec();
        body[..HEADER_LEN].copy_from_slice(&ProtocolVersion::Current.header());

        let mut bad = MemoryJar::new();
        bad.insert_raw("s", RawCookie::Text(Encoding::Base64UrlSafe.encode(&body)));
        let back: Option<Session> = CookieCodec::new(key).fetch(&bad, "s").unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn codec_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CookieCodec>();
    }
}
