//! Runtime configuration loaded from environment variables.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `PV_SIGNING_KEY` | required | hex HMAC key for signed URLs, at least 32 bytes |
//! | `PV_BASE_URL` | `https://localhost:6001` | external prefix of signed links |
//! | `PV_URL_VALIDITY_SECS` | `300` | lifetime of issued links |
//! | `PV_HTTP_HOST` | `0.0.0.0` | bind address |
//! | `PV_HTTP_PORT` | `6001` | bind port |
//! | `PV_MAX_UPLOAD_BYTES` | `10485760` | decoded upload cap |
//! | `PV_JWT_SECRET` | required | hex HS256 key of the identity server |
//! | `PV_JWT_ISSUER` | unset | required `iss` claim |
//! | `PV_JWT_AUDIENCE` | unset | required `aud` claim |

use pv_01_access_control::{AccessConfig, ConfigError, SigningKey, DEFAULT_BASE_URL};
use pv_02_photos_gateway::GatewayConfig;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use zeroize::Zeroizing;

pub const ENV_SIGNING_KEY: &str = "PV_SIGNING_KEY";
pub const ENV_BASE_URL: &str = "PV_BASE_URL";
pub const ENV_URL_VALIDITY_SECS: &str = "PV_URL_VALIDITY_SECS";
pub const ENV_HTTP_HOST: &str = "PV_HTTP_HOST";
pub const ENV_HTTP_PORT: &str = "PV_HTTP_PORT";
pub const ENV_MAX_UPLOAD_BYTES: &str = "PV_MAX_UPLOAD_BYTES";
pub const ENV_JWT_SECRET: &str = "PV_JWT_SECRET";
pub const ENV_JWT_ISSUER: &str = "PV_JWT_ISSUER";
pub const ENV_JWT_AUDIENCE: &str = "PV_JWT_AUDIENCE";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeConfigError {
    /// A required variable is unset or empty
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable could not be parsed
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    /// Access-control settings rejected
    #[error(transparent)]
    Access(#[from] ConfigError),

    /// Gateway settings rejected
    #[error("gateway: {0}")]
    Gateway(String),
}

/// Upstream identity server settings.
#[derive(Clone)]
pub struct IdentityConfig {
    /// HS256 shared secret
    pub jwt_secret: Zeroizing<Vec<u8>>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub access: AccessConfig,
    pub gateway: GatewayConfig,
    pub identity: IdentityConfig,
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, RuntimeConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RuntimeConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        // Access control
        let key_hex = get(ENV_SIGNING_KEY).ok_or(RuntimeConfigError::Missing(ENV_SIGNING_KEY))?;
        let signing_key = SigningKey::from_hex(key_hex.trim())?;
        let base_url = get(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let validity_secs: u64 = parse_or(get(ENV_URL_VALIDITY_SECS), ENV_URL_VALIDITY_SECS, 300)?;

        let access = AccessConfig::new(base_url.trim(), signing_key)?
            .with_url_validity(Duration::from_secs(validity_secs));
        access.validate()?;

        // Gateway
        let mut gateway = GatewayConfig::default();
        gateway.http.host = parse_or(get(ENV_HTTP_HOST), ENV_HTTP_HOST, gateway.http.host)?;
        gateway.http.port = parse_or(get(ENV_HTTP_PORT), ENV_HTTP_PORT, gateway.http.port)?;
        gateway.max_upload_bytes = parse_or(
            get(ENV_MAX_UPLOAD_BYTES),
            ENV_MAX_UPLOAD_BYTES,
            gateway.max_upload_bytes,
        )?;
        gateway
            .validate()
            .map_err(|e| RuntimeConfigError::Gateway(e.to_string()))?;

        // Identity
        let secret_hex = get(ENV_JWT_SECRET).ok_or(RuntimeConfigError::Missing(ENV_JWT_SECRET))?;
        let jwt_secret =
            Zeroizing::new(hex::decode(secret_hex.trim()).map_err(|e| {
                RuntimeConfigError::Invalid {
                    var: ENV_JWT_SECRET,
                    reason: e.to_string(),
                }
            })?);
        if jwt_secret.is_empty() {
            return Err(RuntimeConfigError::Missing(ENV_JWT_SECRET));
        }
        let identity = IdentityConfig {
            jwt_secret,
            issuer: get(ENV_JWT_ISSUER),
            audience: get(ENV_JWT_AUDIENCE),
        };

        Ok(Self {
            access,
            gateway,
            identity,
        })
    }
}

fn parse_or<T>(
    raw: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, RuntimeConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| RuntimeConfigError::Invalid {
                var,
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
    const JWT_HEX: &str = "6a77742d7365637265742d666f722d7465737473";

    fn load(vars: &[(&str, &str)]) -> Result<RuntimeConfig, RuntimeConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|var| map.get(var).cloned())
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![(ENV_SIGNING_KEY, KEY_HEX), (ENV_JWT_SECRET, JWT_HEX)]
    }

    #[test]
    fn test_defaults() {
        let config = load(&required()).unwrap();
        assert_eq!(config.access.base_url.as_str(), "https://localhost:6001/");
        assert_eq!(config.access.url_validity, Duration::from_secs(300));
        assert_eq!(config.gateway.http.port, 6001);
        assert_eq!(config.identity.issuer, None);
        assert_eq!(config.identity.jwt_secret.as_slice(), b"jwt-secret-for-tests");
    }

    #[test]
    fn test_overrides() {
        let mut vars = required();
        vars.extend([
            (ENV_BASE_URL, "https://photos.example.com"),
            (ENV_URL_VALIDITY_SECS, "60"),
            (ENV_HTTP_HOST, "127.0.0.1"),
            (ENV_HTTP_PORT, "8080"),
            (ENV_JWT_ISSUER, "https://identity.example.com"),
            (ENV_JWT_AUDIENCE, "photos"),
        ]);
        let config = load(&vars).unwrap();
        assert_eq!(config.access.base_url.host_str(), Some("photos.example.com"));
        assert_eq!(config.access.url_validity, Duration::from_secs(60));
        assert_eq!(config.gateway.http_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.identity.audience.as_deref(), Some("photos"));
    }

    #[test]
    fn test_missing_required_variables() {
        assert_eq!(
            load(&[(ENV_JWT_SECRET, JWT_HEX)]).unwrap_err(),
            RuntimeConfigError::Missing(ENV_SIGNING_KEY)
        );
        assert_eq!(
            load(&[(ENV_SIGNING_KEY, KEY_HEX)]).unwrap_err(),
            RuntimeConfigError::Missing(ENV_JWT_SECRET)
        );
        assert_eq!(
            load(&[(ENV_SIGNING_KEY, "  "), (ENV_JWT_SECRET, JWT_HEX)]).unwrap_err(),
            RuntimeConfigError::Missing(ENV_SIGNING_KEY)
        );
    }

    #[test]
    fn test_weak_or_placeholder_keys_rejected() {
        let short = load(&[(ENV_SIGNING_KEY, "0102"), (ENV_JWT_SECRET, JWT_HEX)]);
        assert!(matches!(
            short,
            Err(RuntimeConfigError::Access(ConfigError::WeakSigningKey { .. }))
        ));

        let zero = "00".repeat(32);
        let zeroed = load(&[(ENV_SIGNING_KEY, zero.as_str()), (ENV_JWT_SECRET, JWT_HEX)]);
        assert!(matches!(
            zeroed,
            Err(RuntimeConfigError::Access(ConfigError::ZeroSigningKey))
        ));

        let not_hex = load(&[(ENV_SIGNING_KEY, "zz"), (ENV_JWT_SECRET, JWT_HEX)]);
        assert!(matches!(
            not_hex,
            Err(RuntimeConfigError::Access(ConfigError::InvalidKeyEncoding(_)))
        ));
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let mut vars = required();
        vars.push((ENV_HTTP_PORT, "eighty"));
        assert!(matches!(
            load(&vars),
            Err(RuntimeConfigError::Invalid { var: ENV_HTTP_PORT, .. })
        ));

        let mut vars = required();
        vars.push((ENV_URL_VALIDITY_SECS, "0"));
        assert!(matches!(
            load(&vars),
            Err(RuntimeConfigError::Access(ConfigError::ZeroValidity))
        ));

        let mut vars = required();
        vars.push((ENV_BASE_URL, "ftp://photos.example.com"));
        assert!(matches!(
            load(&vars),
            Err(RuntimeConfigError::Access(ConfigError::InvalidBaseUrl(_)))
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&required()).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains(KEY_HEX));
        assert!(!rendered.contains("jwt-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
