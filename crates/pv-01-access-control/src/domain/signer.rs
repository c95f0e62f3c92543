//! # URL Signer / Verifier
//!
//! HMAC-SHA256 over the [canonical request](super::canonical), appended to the
//! URL as `validFrom`, `validTo` and `signature` query parameters.
//!
//! ## Security Notes
//!
//! - **Integrity before time**: the window is only compared once the signature
//!   proves it was not widened by the bearer
//! - **Constant-Time**: the supplied signature is compared with `subtle`
//! - **Deterministic**: same URL, window and key always give the same link
//! - **Key hygiene**: key bytes are zeroized on drop and never printed

use super::canonical::{
    CanonicalRequest, RESERVED_PARAMS, SIGNATURE_PARAM, VALID_FROM_PARAM, VALID_TO_PARAM,
};
use super::entities::{InvalidReason, UrlVerification, ValidityWindow};
use super::errors::{ConfigError, SigningError};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared_types::Timestamp;
use std::fmt;
use subtle::ConstantTimeEq;
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// SIGNING KEY
// =============================================================================

/// Process-wide secret for every signature. Loaded once, never mutated.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey {
    bytes: Vec<u8>,
}

impl SigningKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Decode a hex-encoded key (as supplied through the environment).
    pub fn from_hex(encoded: &str) -> Result<Self, ConfigError> {
        hex::decode(encoded.trim())
            .map(Self::new)
            .map_err(|e| ConfigError::InvalidKeyEncoding(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when every byte is zero (the unconfigured placeholder).
    pub fn is_all_zero(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey(<redacted>; {} bytes)", self.bytes.len())
    }
}

// =============================================================================
// URL SIGNER
// =============================================================================

/// Signs and verifies URLs with one keyed MAC.
///
/// The keyed MAC state is built once; each operation works on a clone of it.
#[derive(Clone)]
pub struct UrlSigner {
    mac: HmacSha256,
}

impl UrlSigner {
    /// Key the signer.
    pub fn new(key: &SigningKey) -> Result<Self, SigningError> {
        if key.is_empty() {
            return Err(SigningError::InvalidKey);
        }
        let mac =
            HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| SigningError::InvalidKey)?;
        Ok(Self { mac })
    }

    /// Produce `url?…&validFrom=<nb>&validTo=<na>&signature=<hex>`.
    ///
    /// Existing query parameters are kept in place and covered by the signature.
    /// The fragment, if any, is dropped.
    pub fn sign(
        &self,
        url: &str,
        not_before: Timestamp,
        not_after: Timestamp,
    ) -> Result<String, SigningError> {
        let window = ValidityWindow::new(not_before, not_after)?;

        let mut url = Url::parse(url).map_err(|e| SigningError::InvalidUrl(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(SigningError::InvalidUrl(format!(
                "'{url}' cannot carry a path and query"
            )));
        }
        if let Some((key, _)) = url
            .query_pairs()
            .find(|(key, _)| RESERVED_PARAMS.iter().any(|reserved| *reserved == *key))
        {
            return Err(SigningError::ReservedParameter(key.into_owned()));
        }

        url.set_fragment(None);
        url.query_pairs_mut()
            .append_pair(VALID_FROM_PARAM, &window.not_before().to_string())
            .append_pair(VALID_TO_PARAM, &window.not_after().to_string());

        let signature = self.signature_for(&url)?;
        url.query_pairs_mut()
            .append_pair(SIGNATURE_PARAM, &signature);

        Ok(url.into())
    }

    /// Check an incoming signed URL at instant `now`.
    ///
    /// Order: parse, then signature, then window.
    pub fn verify(&self, incoming: &str, now: Timestamp) -> UrlVerification {
        let url = match Url::parse(incoming) {
            Ok(url) => url,
            Err(_) => return UrlVerification::Invalid(InvalidReason::Malformed),
        };

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let (Some(valid_from), Some(valid_to), Some(supplied)) = (
            single_value(&pairs, VALID_FROM_PARAM),
            single_value(&pairs, VALID_TO_PARAM),
            single_value(&pairs, SIGNATURE_PARAM),
        ) else {
            return UrlVerification::Invalid(InvalidReason::Malformed);
        };
        let (Some(valid_from), Some(valid_to)) =
            (parse_timestamp(valid_from), parse_timestamp(valid_to))
        else {
            return UrlVerification::Invalid(InvalidReason::Malformed);
        };

        let expected = match self.signature_for(&url) {
            Ok(expected) => expected,
            Err(_) => return UrlVerification::Invalid(InvalidReason::Malformed),
        };
        if !constant_time_eq(supplied, &expected) {
            return UrlVerification::Invalid(InvalidReason::Tampered);
        }

        // Only now are the timestamps trusted.
        let in_window = ValidityWindow::new(valid_from, valid_to)
            .is_ok_and(|window| window.contains(now));
        if !in_window {
            return UrlVerification::Invalid(InvalidReason::Expired);
        }

        UrlVerification::Valid
    }

    /// Lowercase hex HMAC of the URL's canonical form.
    fn signature_for(&self, url: &Url) -> Result<String, SigningError> {
        let canonical = CanonicalRequest::from_url(url)?.to_canonical_string();
        let mut mac = self.mac.clone();
        mac.update(canonical.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlSigner").finish_non_exhaustive()
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Value of `name` if it occurs exactly once.
fn single_value<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    let mut values = pairs
        .iter()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.as_str());
    let first = values.next()?;
    if values.next().is_some() {
        return None;
    }
    Some(first)
}

/// Plain decimal digits only: no sign, no whitespace.
fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Constant-time string comparison.
///
/// `subtle` yields false for unequal lengths without inspecting contents.
fn constant_time_eq(supplied: &str, expected: &str) -> bool {
    supplied.as_bytes().ct_eq(expected.as_bytes()).into()
}
