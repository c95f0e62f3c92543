//! # Access Control Errors
//!
//! Error types for signing and configuration.
//!
//! Verification failures are not errors: they are reported as
//! [`UrlVerification::Invalid`](super::entities::UrlVerification).

use shared_types::Timestamp;
use thiserror::Error;

/// Errors that can occur while producing a signed URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningError {
    /// `not_before` is later than `not_after`
    #[error("Invalid validity window: not_before {not_before} > not_after {not_after}")]
    InvalidWindow {
        not_before: Timestamp,
        not_after: Timestamp,
    },

    /// The URL already carries a parameter the signer owns
    #[error("URL already contains reserved query parameter '{0}'")]
    ReservedParameter(String),

    /// The URL could not be parsed or cannot carry a query
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The MAC could not be keyed
    #[error("Signing key rejected by MAC")]
    InvalidKey,
}

/// Configuration errors, raised once at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No signing key bytes
    #[error("Signing key is empty")]
    EmptySigningKey,

    /// Key shorter than the HMAC-SHA256 output
    #[error("Signing key too short: {len} bytes, need at least {min}")]
    WeakSigningKey { len: usize, min: usize },

    /// Key left at the all-zero placeholder
    #[error("SECURITY VIOLATION: signing key is the all-zero placeholder")]
    ZeroSigningKey,

    /// Signing key text is not hex
    #[error("Signing key is not valid hex: {0}")]
    InvalidKeyEncoding(String),

    /// Base URL unusable as a prefix for signed links
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Links would expire the instant they are issued
    #[error("URL validity must be at least one second")]
    ZeroValidity,

    #[error(transparent)]
    Signing(#[from] SigningError),
}
