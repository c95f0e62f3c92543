//! Bridges the photo repository to the access-control core.

use crate::ports::outbound::PhotoRepository;
use async_trait::async_trait;
use pv_01_access_control::OwnerResolver;
use shared_types::{PhotoId, StorageError, Subject};
use std::sync::Arc;

/// Resolves owners by reading photo metadata.
#[derive(Clone)]
pub struct RepositoryOwnerResolver {
    photos: Arc<dyn PhotoRepository>,
}

impl RepositoryOwnerResolver {
    pub fn new(photos: Arc<dyn PhotoRepository>) -> Self {
        Self { photos }
    }
}

#[async_trait]
impl OwnerResolver for RepositoryOwnerResolver {
    async fn resolve_owner(&self, id: &PhotoId) -> Result<Option<Subject>, StorageError> {
        Ok(self.photos.get_meta(id).await?.map(|meta| meta.owner_id))
    }
}
