use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::repo::EntityKind;

/// API error taxonomy. Every failure is detected synchronously and surfaced
/// to the caller as a single JSON `{"detail": ...}` body; nothing retries.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid ObjectId format")]
    InvalidIdentifier,

    /// A foreign-key target was absent at validation time.
    #[error("{0} not found")]
    InvalidReference(EntityKind),

    #[error("No fields provided")]
    EmptyUpdate,

    /// Request-boundary field constraint violation.
    #[error("{0}")]
    Validation(String),

    #[error("Empty file")]
    EmptyPayload,

    #[error("{0}")]
    InvalidMediaKind(String),

    #[error("{0} not found")]
    NotFound(EntityKind),

    /// The media owner entity was absent.
    #[error("{0} not found")]
    OwnerNotFound(EntityKind),

    #[error("Media not found")]
    MediaNotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidIdentifier
            | ApiError::InvalidReference(_)
            | ApiError::EmptyUpdate
            | ApiError::Validation(_)
            | ApiError::EmptyPayload
            | ApiError::InvalidMediaKind(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::OwnerNotFound(_) | ApiError::MediaNotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match &self {
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidIdentifier.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidReference(EntityKind::Venue).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::EmptyUpdate.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::EmptyPayload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound(EntityKind::Booking).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::MediaNotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_reference_message_names_the_kind() {
        let err = ApiError::InvalidReference(EntityKind::Venue);
        assert_eq!(err.to_string(), "Venue not found");
    }
}
