//! # Access Configuration
//!
//! Loaded once at process start and never mutated.
//!
//! ## Security Requirements
//!
//! - `signing_key` MUST NOT be empty, all-zero, or shorter than 32 bytes
//! - `base_url` is the externally visible prefix of every signed link

use super::errors::ConfigError;
use super::signer::SigningKey;
use shared_types::PhotoId;
use std::time::Duration;
use url::Url;

/// Production validity of an issued link (5 minutes).
pub const DEFAULT_URL_VALIDITY: Duration = Duration::from_secs(300);

/// Shortest accepted signing key, matching the HMAC-SHA256 output size.
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Default external origin, used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://localhost:6001";

/// Configuration for the access-control subsystem.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// External prefix of signed links, e.g. `https://photos.example.com`.
    pub base_url: Url,
    /// Process-wide HMAC key.
    pub signing_key: SigningKey,
    /// Lifetime of links produced by the issuance flow.
    pub url_validity: Duration,
}

impl AccessConfig {
    /// Build and validate a configuration with the default validity.
    pub fn new(base_url: &str, signing_key: SigningKey) -> Result<Self, ConfigError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;
        let config = Self {
            base_url,
            signing_key,
            url_validity: DEFAULT_URL_VALIDITY,
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the link lifetime.
    pub fn with_url_validity(mut self, url_validity: Duration) -> Self {
        self.url_validity = url_validity;
        self
    }

    /// Validate configuration for production readiness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signing_key.is_empty() {
            return Err(ConfigError::EmptySigningKey);
        }
        if self.signing_key.is_all_zero() {
            return Err(ConfigError::ZeroSigningKey);
        }
        if self.signing_key.len() < MIN_SIGNING_KEY_LEN {
            return Err(ConfigError::WeakSigningKey {
                len: self.signing_key.len(),
                min: MIN_SIGNING_KEY_LEN,
            });
        }

        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(format!(
                "unsupported scheme '{}'",
                self.base_url.scheme()
            )));
        }
        if self.base_url.host().is_none() {
            return Err(ConfigError::InvalidBaseUrl("missing host".into()));
        }
        if self.base_url.query().is_some() || self.base_url.fragment().is_some() {
            return Err(ConfigError::InvalidBaseUrl(
                "must not carry a query or fragment".into(),
            ));
        }

        if self.url_validity.as_secs() == 0 {
            return Err(ConfigError::ZeroValidity);
        }
        Ok(())
    }

    /// Join the base URL with a request path such as `/api/photos/<id>/signed-content?…`.
    pub fn external_url(&self, path_and_query: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path_and_query.starts_with('/') {
            format!("{base}{path_and_query}")
        } else {
            format!("{base}/{path_and_query}")
        }
    }

    /// Unsigned anonymous-retrieval URL for a photo.
    pub fn content_url(&self, id: &PhotoId) -> String {
        self.external_url(&content_path(id))
    }
}

/// Path of the anonymous signed-content endpoint for a photo.
pub fn content_path(id: &PhotoId) -> String {
    format!("/api/photos/{id}/signed-content")
}
