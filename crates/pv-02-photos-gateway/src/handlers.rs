//! Request handlers for `/api/photos` and `/health`.
//!
//! Protected handlers receive the caller's [`IdentityAssertion`] from the
//! identity layer and pass the ownership gate before touching any photo.
//! The signed-content handler is anonymous: the URL itself is the credential.

use crate::domain::error::{ApiError, ApiResult};
use crate::domain::types::{AddPhotoRequest, ListPhotosQuery, PhotoDto, UpdatePhotoRequest};
use crate::service::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use pv_01_access_control::{InvalidReason, OwnershipOutcome, UrlVerification};
use shared_types::{IdentityAssertion, PhotoContent, PhotoId, PhotoMeta};
use tracing::{debug, info, warn};

// =============================================================================
// PROTECTED ENDPOINTS
// =============================================================================

/// `GET /api/photos?ownerId=X`
pub async fn list_photos(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityAssertion>,
    query: Result<Query<ListPhotosQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PhotoDto>>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    if !state
        .access
        .authorize(identity.subject(), &query.owner_id)
        .is_allowed()
    {
        return Err(ApiError::Forbidden);
    }

    let metas = state.photos.list_by_owner(&query.owner_id).await?;
    let photos = metas
        .into_iter()
        .map(|meta| to_dto(&state, meta))
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(photos))
}

/// `GET /api/photos/:id/meta`
pub async fn get_photo_meta(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityAssertion>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<PhotoDto>> {
    let id = parse_photo_id(&raw_id)?;
    require_owner(&state, &identity, &id).await?;

    let meta = state.photos.get_meta(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(to_dto(&state, meta)?))
}

/// `GET /api/photos/:id/content`
pub async fn get_photo_content(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityAssertion>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_photo_id(&raw_id)?;
    require_owner(&state, &identity, &id).await?;

    let content = state
        .photos
        .get_content(&id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(content_response(content))
}

/// `POST /api/photos`
pub async fn add_photo(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityAssertion>,
    body: Result<Json<AddPhotoRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    if !state
        .access
        .authorize(identity.subject(), &body.owner_id)
        .is_allowed()
    {
        return Err(ApiError::Forbidden);
    }

    let title = validate_title(&body.title)?;
    let content = STANDARD
        .decode(body.base64_content.as_bytes())
        .map_err(|e| ApiError::bad_request(format!("invalid base64 content: {e}")))?;
    if content.len() > state.config.max_upload_bytes {
        return Err(ApiError::bad_request(format!(
            "photo exceeds {} bytes",
            state.config.max_upload_bytes
        )));
    }

    if !state.photos.add(title, &body.owner_id, content).await? {
        return Err(ApiError::Conflict);
    }
    info!(owner = %body.owner_id, "Photo added");
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/photos/:id`
pub async fn update_photo(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityAssertion>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdatePhotoRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let id = parse_photo_id(&raw_id)?;
    require_owner(&state, &identity, &id).await?;

    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let title = validate_title(&body.title)?;

    if !state.photos.update_title(&id, title).await? {
        return Err(ApiError::Conflict);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/photos/:id`
pub async fn delete_photo(
    State(state): State<AppState>,
    Extension(identity): Extension<IdentityAssertion>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_photo_id(&raw_id)?;
    require_owner(&state, &identity, &id).await?;

    if !state.photos.delete(&id).await? {
        return Err(ApiError::Conflict);
    }
    info!(photo_id = %id, "Photo deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// ANONYMOUS ENDPOINTS
// =============================================================================

/// `GET /api/photos/:id/signed-content`
///
/// Every verification failure is a bare 403; the reason is only logged.
pub async fn get_signed_content(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Response> {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    if let UrlVerification::Invalid(reason) = state.access.verify_request(path_and_query) {
        if reason == InvalidReason::Tampered {
            warn!(path = %uri.path(), reason = reason.as_str(), "Signed URL rejected");
        } else {
            debug!(path = %uri.path(), reason = reason.as_str(), "Signed URL rejected");
        }
        return Err(ApiError::Forbidden);
    }

    // An id segment that does not even decode names no photo.
    let Ok(Path(raw_id)) = raw_id else {
        return Err(ApiError::NotFound);
    };
    let id = parse_photo_id(&raw_id)?;
    let content = state
        .photos
        .get_content(&id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(content_response(content))
}

/// `GET /health`
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// =============================================================================
// HELPERS
// =============================================================================

/// An id that is not a UUID names no photo.
fn parse_photo_id(raw: &str) -> ApiResult<PhotoId> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

async fn require_owner(
    state: &AppState,
    identity: &IdentityAssertion,
    id: &PhotoId,
) -> ApiResult<()> {
    match state
        .access
        .authorize_resource(identity.subject(), id)
        .await?
    {
        OwnershipOutcome::Allow => Ok(()),
        OwnershipOutcome::Deny => {
            debug!(photo_id = %id, subject = %identity.subject(), "Ownership denied");
            Err(ApiError::Forbidden)
        }
        OwnershipOutcome::NotFound => Err(ApiError::NotFound),
    }
}

fn validate_title(title: &str) -> ApiResult<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("title must not be empty"));
    }
    Ok(title)
}

fn to_dto(state: &AppState, meta: PhotoMeta) -> ApiResult<PhotoDto> {
    let url = state
        .access
        .issue_content_url(&meta.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(PhotoDto::from_meta(meta, url))
}

fn content_response(content: PhotoContent) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", content.file_name);
    (
        [
            (header::CONTENT_TYPE, content.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content.content,
    )
        .into_response()
}
