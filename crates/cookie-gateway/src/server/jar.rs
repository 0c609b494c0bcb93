//! [`HeaderJar`]: a [`Transport`] over one HTTP request/response exchange.
//!
//! Reads come from the request `Cookie` header. Writes become `Set-Cookie`
//! response headers and are also visible to later reads on the same jar.

use std::collections::HashMap;

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use chrono::{DateTime, Utc};
use common::{cookie::is_valid_attribute_value, CookieOptions, RawCookie};
use envelope::Transport;
use tracing::debug;

/// IMF-fixdate, as required for the `Expires` attribute.
const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Cookie storage for a single request.
#[derive(Debug, Default)]
pub struct HeaderJar {
    incoming: HashMap<String, RawCookie>,
    outgoing: Vec<HeaderValue>,
}

impl HeaderJar {
    /// Parse every `Cookie` header of a request.
    ///
    /// The first occurrence of a name wins. Names ending in `[]` are collected
    /// into a [`RawCookie::List`] under the bare name. A pair that is not valid
    /// UTF-8 is skipped on its own; the rest of the header is still read.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut incoming: HashMap<String, RawCookie> = HashMap::new();

        let pairs = headers
            .get_all(COOKIE)
            .iter()
            .flat_map(|v| v.as_bytes().split(|&b| b == b';'))
            .filter_map(|pair| std::str::from_utf8(pair).ok())
            .filter_map(|pair| pair.trim().split_once('='));

        for (name, value) in pairs {
            let name = name.trim();
            let value = unquote(value.trim());
            if name.is_empty() {
                continue;
            }
            if let Some(base) = name.strip_suffix("[]") {
                let entry = incoming
                    .entry(base.to_owned())
                    .or_insert_with(|| RawCookie::List(Vec::new()));
                if let RawCookie::List(items) = entry {
                    items.push(value.to_owned());
                }
            } else {
                incoming
                    .entry(name.to_owned())
                    .or_insert_with(|| RawCookie::Text(value.to_owned()));
            }
        }

        Self {
            incoming,
            outgoing: Vec::new(),
        }
    }

    /// Consume the jar, yielding one `Set-Cookie` value per successful write.
    pub fn into_set_cookie_headers(self) -> Vec<HeaderValue> {
        self.outgoing
    }
}

impl Transport for HeaderJar {
    fn get(&self, name: &str) -> Option<RawCookie> {
        self.incoming.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str, options: &CookieOptions) -> bool {
        if !is_valid_cookie_name(name) || !value.bytes().all(is_cookie_octet) {
            debug!(cookie = name, "refusing to write unrepresentable cookie");
            return false;
        }
        let domain_ok = options
            .domain
            .as_deref()
            .map_or(true, is_valid_attribute_value);
        if !is_valid_attribute_value(&options.path) || !domain_ok {
            debug!(cookie = name, "refusing to write cookie with unsafe path or domain");
            return false;
        }

        let mut line = format!("{name}={value}; Path={}", options.path);
        if let Some(domain) = &options.domain {
            line.push_str("; Domain=");
            line.push_str(domain);
        }
        if let Some(expires) = options.expires {
            let Some(at) = DateTime::<Utc>::from_timestamp(expires, 0) else {
                return false;
            };
            line.push_str("; Expires=");
            line.push_str(&at.format(EXPIRES_FORMAT).to_string());
        }
        if options.secure {
            line.push_str("; Secure");
        }
        if options.http_only {
            line.push_str("; HttpOnly");
        }
        if let Some(same_site) = options.same_site {
            line.push_str("; SameSite=");
            line.push_str(same_site.as_str());
        }

        let Ok(header) = HeaderValue::from_str(&line) else {
            return false;
        };
        self.outgoing.push(header);
        self.incoming
            .insert(name.to_owned(), RawCookie::Text(value.to_owned()));
        true
    }
}

/// RFC 6265 cookie-name: an HTTP token.
pub fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}

/// RFC 6265 cookie-octet.
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
