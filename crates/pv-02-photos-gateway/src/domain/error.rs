//! Gateway error types and their HTTP mapping.
//!
//! Every failure a client can observe collapses to one of a handful of
//! statuses. Reasons stay in the logs.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared_types::StorageError;
use tracing::error;

/// Client-facing error, rendered as `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Malformed body, query or payload
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid bearer token
    #[error("unauthorized")]
    Unauthorized,

    /// Ownership denied or signed URL rejected
    #[error("forbidden")]
    Forbidden,

    /// No such photo
    #[error("not found")]
    NotFound,

    /// Repository refused the write
    #[error("conflict")]
    Conflict,

    /// Backend failure; details are logged, never returned
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::BadRequest(details.into())
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(details) => details.clone(),
            Self::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(details) = &self {
            error!(error = %details, "Request failed");
        }

        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.public_message() }));
        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Why a bearer token did not yield an identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// No `Authorization: Bearer` header
    #[error("missing bearer token")]
    MissingToken,

    /// Header present but not a bearer credential
    #[error("malformed authorization header")]
    MalformedHeader,

    /// Token failed validation
    #[error("token rejected: {0}")]
    Rejected(String),

    /// Token valid but carries no subject
    #[error("token has no subject")]
    EmptySubject,
}

impl From<IdentityError> for ApiError {
    fn from(_: IdentityError) -> Self {
        ApiError::Unauthorized
    }
}

/// Gateway-level errors (not client-facing)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Server(String),
}
