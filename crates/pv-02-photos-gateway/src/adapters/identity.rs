//! Identity validators.
//!
//! `Hs256IdentityValidator` checks tokens minted by the upstream identity
//! server. `StaticIdentityValidator` maps fixed tokens to subjects for tests
//! and local runs.

use crate::domain::error::IdentityError;
use crate::ports::outbound::IdentityValidator;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use shared_types::{IdentityAssertion, Subject};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: String,
}

/// HS256 JWT validator: signature, `exp`, and optionally `iss` / `aud`.
#[derive(Clone)]
pub struct Hs256IdentityValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256IdentityValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Require the `iss` claim to equal `issuer`.
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    /// Require the `aud` claim to contain `audience`.
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self
    }
}

impl fmt::Debug for Hs256IdentityValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hs256IdentityValidator")
            .field("iss", &self.validation.iss)
            .field("aud", &self.validation.aud)
            .finish_non_exhaustive()
    }
}

impl IdentityValidator for Hs256IdentityValidator {
    fn validate(&self, bearer_token: &str) -> Result<IdentityAssertion, IdentityError> {
        let data = decode::<Claims>(bearer_token, &self.key, &self.validation)
            .map_err(|e| IdentityError::Rejected(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(IdentityError::EmptySubject);
        }
        Ok(IdentityAssertion::new(Subject::new(data.claims.sub)))
    }
}

/// Fixed token → subject table.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityValidator {
    tokens: HashMap<String, Subject>,
}

impl StaticIdentityValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, subject: impl Into<Subject>) -> Self {
        self.tokens.insert(token.into(), subject.into());
        self
    }
}

impl IdentityValidator for StaticIdentityValidator {
    fn validate(&self, bearer_token: &str) -> Result<IdentityAssertion, IdentityError> {
        self.tokens
            .get(bearer_token)
            .cloned()
            .map(IdentityAssertion::new)
            .ok_or_else(|| IdentityError::Rejected("unknown token".into()))
    }
}
