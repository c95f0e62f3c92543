//! In-memory photo repository.
//!
//! Titles are unique per owner; a second photo with the same title for the
//! same owner is refused. Content type is detected from the bytes at insert.

use crate::domain::media::sniff_media_type;
use crate::ports::outbound::PhotoRepository;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{PhotoContent, PhotoId, PhotoMeta, StorageError, Subject};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredPhoto {
    meta: PhotoMeta,
    content: PhotoContent,
}

/// Photo store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryPhotoRepository {
    photos: RwLock<HashMap<PhotoId, StoredPhoto>>,
    failure: RwLock<Option<String>>,
}

impl InMemoryPhotoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a photo and return its fresh id, or `None` if the title is taken.
    pub fn insert(&self, title: &str, owner: &Subject, content: Vec<u8>) -> Option<PhotoId> {
        let mut photos = self.photos.write();
        if title_taken(&photos, owner, title, None) {
            return None;
        }

        let id = PhotoId::new_v4();
        let media = sniff_media_type(&content);
        photos.insert(
            id,
            StoredPhoto {
                meta: PhotoMeta {
                    id,
                    title: title.to_string(),
                    owner_id: owner.clone(),
                },
                content: PhotoContent {
                    content,
                    content_type: media.mime.to_string(),
                    file_name: format!("{id}.{}", media.extension),
                },
            },
        );
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.photos.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.read().is_empty()
    }

    /// Make every subsequent operation fail with a backend error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write() = Some(message.into());
    }

    fn check_backend(&self) -> Result<(), StorageError> {
        match self.failure.read().as_ref() {
            Some(message) => Err(StorageError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

fn title_taken(
    photos: &HashMap<PhotoId, StoredPhoto>,
    owner: &Subject,
    title: &str,
    except: Option<&PhotoId>,
) -> bool {
    photos.values().any(|stored| {
        stored.meta.owner_id == *owner
            && stored.meta.title == title
            && Some(&stored.meta.id) != except
    })
}

#[async_trait]
impl PhotoRepository for InMemoryPhotoRepository {
    async fn list_by_owner(&self, owner: &Subject) -> Result<Vec<PhotoMeta>, StorageError> {
        self.check_backend()?;
        let mut metas: Vec<PhotoMeta> = self
            .photos
            .read()
            .values()
            .filter(|stored| stored.meta.owner_id == *owner)
            .map(|stored| stored.meta.clone())
            .collect();
        metas.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(metas)
    }

    async fn get_meta(&self, id: &PhotoId) -> Result<Option<PhotoMeta>, StorageError> {
        self.check_backend()?;
        Ok(self.photos.read().get(id).map(|stored| stored.meta.clone()))
    }

    async fn get_content(&self, id: &PhotoId) -> Result<Option<PhotoContent>, StorageError> {
        self.check_backend()?;
        Ok(self.photos.read().get(id).map(|stored| stored.content.clone()))
    }

    async fn add(
        &self,
        title: &str,
        owner: &Subject,
        content: Vec<u8>,
    ) -> Result<bool, StorageError> {
        self.check_backend()?;
        let id = self.insert(title, owner, content);
        debug!(owner = %owner, stored = id.is_some(), "Photo add");
        Ok(id.is_some())
    }

    async fn update_title(&self, id: &PhotoId, title: &str) -> Result<bool, StorageError> {
        self.check_backend()?;
        let mut photos = self.photos.write();
        let Some(owner) = photos.get(id).map(|stored| stored.meta.owner_id.clone()) else {
            return Ok(false);
        };
        if title_taken(&photos, &owner, title, Some(id)) {
            return Ok(false);
        }
        if let Some(stored) = photos.get_mut(id) {
            stored.meta.title = title.to_string();
        }
        Ok(true)
    }

    async fn delete(&self, id: &PhotoId) -> Result<bool, StorageError> {
        self.check_backend()?;
        Ok(self.photos.write().remove(id).is_some())
    }
}
