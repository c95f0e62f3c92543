//! # Canonical Request
//!
//! The exact byte sequence fed into the MAC. Built from structured URL parts,
//! never from the raw URL text, so two URLs that mean the same thing sign the same.
//!
//! ## Format
//!
//! Four lines joined by `\n`, no trailing newline:
//!
//! ```text
//! PV-HMAC-SHA256
//! https://host[:port]
//! /percent/encoded/path
//! a=1&validFrom=1700000000&validTo=1700000300
//! ```
//!
//! - Origin: lowercase scheme and host, port only when not the scheme default
//! - Path: as serialized by the URL parser
//! - Query: every pair except `signature`, form-decoded to raw bytes then
//!   re-encoded, sorted by `(key, value)` bytes. Escapes that are not valid
//!   UTF-8 keep their exact bytes.
//! - Fragments never take part

use super::errors::SigningError;
use percent_encoding::percent_decode;
use url::{form_urlencoded, Host, Url};

/// First line of every canonical string. Changing it invalidates all issued links.
pub const CANONICAL_PREFIX: &str = "PV-HMAC-SHA256";

/// Query parameter carrying the window start (Unix seconds).
pub const VALID_FROM_PARAM: &str = "validFrom";

/// Query parameter carrying the window end (Unix seconds).
pub const VALID_TO_PARAM: &str = "validTo";

/// Query parameter carrying the hex MAC. Never part of its own input.
pub const SIGNATURE_PARAM: &str = "signature";

/// Parameters the signer appends and a caller's URL may not already contain.
pub const RESERVED_PARAMS: [&str; 3] = [VALID_FROM_PARAM, VALID_TO_PARAM, SIGNATURE_PARAM];

/// Structured form of a URL, ready to be serialized for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    origin: String,
    path: String,
    query: Vec<(Vec<u8>, Vec<u8>)>,
}

impl CanonicalRequest {
    /// Decompose a parsed URL.
    ///
    /// Drops the `signature` pair and sorts the rest.
    pub fn from_url(url: &Url) -> Result<Self, SigningError> {
        let origin = canonical_origin(url)?;

        let mut query: Vec<(Vec<u8>, Vec<u8>)> = raw_query_pairs(url.query().unwrap_or(""))
            .filter(|(key, _)| key.as_slice() != SIGNATURE_PARAM.as_bytes())
            .collect();
        query.sort();

        Ok(Self {
            origin,
            path: url.path().to_string(),
            query,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Serialized, sorted query without the signature pair.
    pub fn canonical_query(&self) -> String {
        self.query
            .iter()
            .map(|(key, value)| {
                let mut pair: String = form_urlencoded::byte_serialize(key).collect();
                pair.push('=');
                pair.extend(form_urlencoded::byte_serialize(value));
                pair
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// The string the MAC is computed over.
    pub fn to_canonical_string(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}",
            CANONICAL_PREFIX,
            self.origin,
            self.path,
            self.canonical_query()
        )
    }
}

/// Form-decode `a=1&b=2` into byte pairs.
///
/// Same splitting rules as `form_urlencoded::parse`, but never lossy.
fn raw_query_pairs(query: &str) -> impl Iterator<Item = (Vec<u8>, Vec<u8>)> + '_ {
    query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            (form_decode(key), form_decode(value))
        })
}

/// `+` is a space, then percent escapes become their bytes.
fn form_decode(component: &str) -> Vec<u8> {
    let plus_as_space: Vec<u8> = component
        .bytes()
        .map(|byte| if byte == b'+' { b' ' } else { byte })
        .collect();
    percent_decode(&plus_as_space).collect()
}

/// `scheme://host[:port]` with the default port elided.
fn canonical_origin(url: &Url) -> Result<String, SigningError> {
    let host = match url.host() {
        Some(Host::Domain(domain)) => domain.to_ascii_lowercase(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => format!("[{addr}]"),
        None => {
            return Err(SigningError::InvalidUrl(format!(
                "'{url}' has no host"
            )))
        }
    };

    let scheme = url.scheme().to_ascii_lowercase();
    // `Url::port` is already `None` for the scheme's default port.
    Ok(match url.port() {
        Some(port) => format!("{scheme}://{host}:{port}"),
        None => format!("{scheme}://{host}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(raw: &str) -> String {
        let url = Url::parse(raw).unwrap();
        CanonicalRequest::from_url(&url)
            .unwrap()
            .to_canonical_string()
    }

    #[test]
    fn test_canonical_layout() {
        assert_eq!(
            canonical("https://host/api/photos/R1/signed-content?validFrom=1&validTo=2"),
            "PV-HMAC-SHA256\nhttps://host\n/api/photos/R1/signed-content\nvalidFrom=1&validTo=2"
        );
    }

    #[test]
    fn test_signature_param_is_excluded() {
        assert_eq!(
            canonical("https://host/p?validFrom=1&signature=abc&validTo=2"),
            canonical("https://host/p?validFrom=1&validTo=2")
        );
    }

    #[test]
    fn test_query_order_does_not_matter() {
        assert_eq!(
            canonical("https://host/p?b=2&a=1&validTo=9"),
            canonical("https://host/p?validTo=9&a=1&b=2")
        );
    }

    #[test]
    fn test_equivalent_encodings_canonicalize_identically() {
        assert_eq!(
            canonical("https://host/p?name=a%20b"),
            canonical("https://host/p?name=a+b")
        );
        assert_eq!(
            canonical("HTTPS://HOST:443/p"),
            canonical("https://host/p")
        );
    }

    #[test]
    fn test_invalid_utf8_escapes_stay_distinct() {
        assert_ne!(
            canonical("https://host/p?tag=%FF"),
            canonical("https://host/p?tag=%FE")
        );
        assert_ne!(
            canonical("https://host/p?tag=%FF"),
            canonical("https://host/p?tag=%EF%BF%BD")
        );
        assert_eq!(
            canonical("https://host/p?tag=%ff"),
            "PV-HMAC-SHA256\nhttps://host\n/p\ntag=%FF"
        );
    }

    #[test]
    fn test_valueless_pair_matches_empty_value() {
        assert_eq!(canonical("https://host/p?flag"), canonical("https://host/p?flag="));
    }

    #[test]
    fn test_non_default_port_is_kept() {
        let url = Url::parse("https://localhost:6001/api").unwrap();
        let request = CanonicalRequest::from_url(&url).unwrap();
        assert_eq!(request.origin(), "https://localhost:6001");
        assert_eq!(request.path(), "/api");
    }

    #[test]
    fn test_duplicate_keys_are_kept_and_sorted_by_value() {
        assert_eq!(
            canonical("https://host/p?tag=z&tag=a"),
            "PV-HMAC-SHA256\nhttps://host\n/p\ntag=a&tag=z"
        );
    }

    #[test]
    fn test_path_change_changes_canonical_form() {
        assert_ne!(
            canonical("https://host/api/photos/R1"),
            canonical("https://host/api/photos/R2")
        );
    }

    #[test]
    fn test_fragment_is_ignored() {
        assert_eq!(canonical("https://host/p#frag"), canonical("https://host/p"));
    }

    #[test]
    fn test_ipv6_host() {
        let url = Url::parse("http://[::1]:8080/p").unwrap();
        let request = CanonicalRequest::from_url(&url).unwrap();
        assert_eq!(request.origin(), "http://[::1]:8080");
    }

    #[test]
    fn test_hostless_url_rejected() {
        let url = Url::parse("mailto:alice@example.com").unwrap();
        assert!(matches!(
            CanonicalRequest::from_url(&url),
            Err(SigningError::InvalidUrl(_))
        ));
    }
}
