//! Request and response bodies of the photo API.

use serde::{Deserialize, Serialize};
use shared_types::{PhotoId, PhotoMeta, Subject};

/// A photo as returned to clients, with a time-boxed link to its bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDto {
    pub id: PhotoId,
    pub title: String,
    pub owner_id: Subject,
    /// Signed URL of the anonymous content endpoint
    pub url: String,
}

impl PhotoDto {
    pub fn from_meta(meta: PhotoMeta, url: String) -> Self {
        Self {
            id: meta.id,
            title: meta.title,
            owner_id: meta.owner_id,
            url,
        }
    }
}

/// Body of `POST /api/photos`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPhotoRequest {
    pub title: String,
    pub owner_id: Subject,
    /// Standard base64 with padding
    pub base64_content: String,
}

/// Body of `PUT /api/photos/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePhotoRequest {
    pub title: String,
}

/// Query of `GET /api/photos`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPhotosQuery {
    pub owner_id: Subject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_dto_wire_names() {
        let dto = PhotoDto {
            id: PhotoId::new_v4(),
            title: "Sunset".into(),
            owner_id: Subject::new("alice"),
            url: "https://host/x".into(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["ownerId"], "alice");
        assert_eq!(json["title"], "Sunset");
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn test_add_request_wire_names() {
        let req: AddPhotoRequest = serde_json::from_str(
            r#"{"title":"t","ownerId":"alice","base64Content":"AAEC"}"#,
        )
        .unwrap();
        assert_eq!(req.owner_id, Subject::new("alice"));
        assert_eq!(req.base64_content, "AAEC");
    }
}
