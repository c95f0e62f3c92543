//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use crate::domain::entities::{AuthorizationDecision, OwnershipOutcome, UrlVerification};
use crate::domain::errors::SigningError;
use shared_types::{PhotoId, StorageError, Subject, Timestamp};

/// Primary Access Control API.
///
/// This is the entry point the gateway uses for both gates.
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait::async_trait]
pub trait AccessControlApi: Send + Sync {
    // =========================================================================
    // Ownership Gate
    // =========================================================================

    /// Allow iff `caller` and `owner` are identical.
    fn authorize(&self, caller: &Subject, owner: &Subject) -> AuthorizationDecision;

    /// Resolve the photo's owner, then authorize.
    ///
    /// `NotFound` is returned before any comparison when the photo does not exist.
    async fn authorize_resource(
        &self,
        caller: &Subject,
        id: &PhotoId,
    ) -> Result<OwnershipOutcome, StorageError>;

    // =========================================================================
    // Signed URL Gate
    // =========================================================================

    /// Sign `url` for the closed window `[not_before, not_after]`.
    fn sign_url(
        &self,
        url: &str,
        not_before: Timestamp,
        not_after: Timestamp,
    ) -> Result<String, SigningError>;

    /// Verify a signed URL at an explicit instant.
    fn verify_url(&self, url: &str, now: Timestamp) -> UrlVerification;

    /// Verify a signed URL at the injected clock's current time.
    fn verify_url_now(&self, url: &str) -> UrlVerification;

    /// Verify an anonymous request by its path and query, relative to the base URL.
    fn verify_request(&self, path_and_query: &str) -> UrlVerification;

    /// Issue a link to the photo's signed-content endpoint, valid from now
    /// for the configured lifetime.
    fn issue_content_url(&self, id: &PhotoId) -> Result<String, SigningError>;
}
