//! In-memory owner lookup, for tests and single-process deployments.

use crate::ports::outbound::OwnerResolver;
use parking_lot::RwLock;
use shared_types::{PhotoId, StorageError, Subject};
use std::collections::HashMap;

/// Owner table held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryOwnerResolver {
    owners: RwLock<HashMap<PhotoId, Subject>>,
    failure: RwLock<Option<String>>,
}

impl InMemoryOwnerResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the owner of a photo.
    pub fn insert(&self, id: PhotoId, owner: Subject) {
        self.owners.write().insert(id, owner);
    }

    pub fn remove(&self, id: &PhotoId) -> Option<Subject> {
        self.owners.write().remove(id)
    }

    /// Make every subsequent lookup fail with a backend error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write() = Some(message.into());
    }
}

#[async_trait::async_trait]
impl OwnerResolver for InMemoryOwnerResolver {
    async fn resolve_owner(&self, id: &PhotoId) -> Result<Option<Subject>, StorageError> {
        if let Some(message) = self.failure.read().as_ref() {
            return Err(StorageError::Backend(message.clone()));
        }
        Ok(self.owners.read().get(id).cloned())
    }
}
