//! # Access Control Service
//!
//! Application service layer that implements the `AccessControlApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`AccessControlApi`)
//! - Uses the outbound ports (`OwnerResolver`, `TimeSource`)
//! - Delegates authorization and signing to the domain layer

use crate::domain::config::AccessConfig;
use crate::domain::entities::{AuthorizationDecision, OwnershipOutcome, UrlVerification};
use crate::domain::errors::{ConfigError, SigningError};
use crate::domain::ownership;
use crate::domain::signer::UrlSigner;
use crate::ports::inbound::AccessControlApi;
use crate::ports::outbound::{OwnerResolver, TimeSource};
use shared_types::{PhotoId, StorageError, Subject, Timestamp};
use std::sync::Arc;
use tracing::debug;

/// Access Control Service.
///
/// Holds an immutable snapshot of the configuration and the keyed signer.
/// Safe to share across any number of concurrent requests.
pub struct AccessControlService<R: OwnerResolver, T: TimeSource> {
    config: Arc<AccessConfig>,
    signer: Arc<UrlSigner>,
    owners: R,
    clock: T,
}

impl<R: OwnerResolver, T: TimeSource> AccessControlService<R, T> {
    /// Create a new access control service.
    ///
    /// # Arguments
    /// * `config` - Validated base URL, signing key and link lifetime
    /// * `owners` - Owner lookup backed by persistence
    /// * `clock` - Time source for issuance and verification
    pub fn new(config: AccessConfig, owners: R, clock: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let signer = UrlSigner::new(&config.signing_key)?;
        Ok(Self {
            config: Arc::new(config),
            signer: Arc::new(signer),
            owners,
            clock,
        })
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl<R: OwnerResolver, T: TimeSource> AccessControlApi for AccessControlService<R, T> {
    fn authorize(&self, caller: &Subject, owner: &Subject) -> AuthorizationDecision {
        ownership::authorize(caller, owner)
    }

    async fn authorize_resource(
        &self,
        caller: &Subject,
        id: &PhotoId,
    ) -> Result<OwnershipOutcome, StorageError> {
        // Existence first: a missing photo is never reported as a denial.
        let Some(owner) = self.owners.resolve_owner(id).await? else {
            debug!(photo_id = %id, "Ownership check on unknown photo");
            return Ok(OwnershipOutcome::NotFound);
        };

        let decision = ownership::authorize(caller, &owner);
        debug!(photo_id = %id, decision = ?decision, "Ownership check");
        Ok(decision.into())
    }

    fn sign_url(
        &self,
        url: &str,
        not_before: Timestamp,
        not_after: Timestamp,
    ) -> Result<String, SigningError> {
        self.signer.sign(url, not_before, not_after)
    }

    fn verify_url(&self, url: &str, now: Timestamp) -> UrlVerification {
        self.signer.verify(url, now)
    }

    fn verify_url_now(&self, url: &str) -> UrlVerification {
        self.signer.verify(url, self.clock.now())
    }

    fn verify_request(&self, path_and_query: &str) -> UrlVerification {
        let url = self.config.external_url(path_and_query);
        self.verify_url_now(&url)
    }

    fn issue_content_url(&self, id: &PhotoId) -> Result<String, SigningError> {
        let not_before = self.clock.now();
        let not_after = not_before.saturating_add(self.config.url_validity.as_secs());
        let signed = self
            .signer
            .sign(&self.config.content_url(id), not_before, not_after)?;
        debug!(photo_id = %id, not_after, "Issued signed content URL");
        Ok(signed)
    }
}
