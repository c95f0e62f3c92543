//! Outbound ports for the photos gateway.
//!
//! The gateway never understands token formats or storage layouts; both
//! live behind these traits.

use crate::domain::error::IdentityError;
use async_trait::async_trait;
use shared_types::{IdentityAssertion, PhotoContent, PhotoId, PhotoMeta, StorageError, Subject};

/// Turns a bearer token into an authenticated subject.
pub trait IdentityValidator: Send + Sync {
    fn validate(&self, bearer_token: &str) -> Result<IdentityAssertion, IdentityError>;
}

/// Photo persistence.
///
/// Writes return `Ok(false)` when the store refuses them (conflict) and
/// `Err` only when the backend itself fails.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// All photos owned by `owner`, ordered by title.
    async fn list_by_owner(&self, owner: &Subject) -> Result<Vec<PhotoMeta>, StorageError>;

    async fn get_meta(&self, id: &PhotoId) -> Result<Option<PhotoMeta>, StorageError>;

    async fn get_content(&self, id: &PhotoId) -> Result<Option<PhotoContent>, StorageError>;

    /// Store a new photo owned by `owner`.
    async fn add(&self, title: &str, owner: &Subject, content: Vec<u8>)
        -> Result<bool, StorageError>;

    /// Rename a photo. Ownership never changes.
    async fn update_title(&self, id: &PhotoId, title: &str) -> Result<bool, StorageError>;

    async fn delete(&self, id: &PhotoId) -> Result<bool, StorageError>;
}
