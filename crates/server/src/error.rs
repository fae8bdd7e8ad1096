//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`,
//! and every error body has the shape `{ "message": "..." }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::{EntityKind, ValidationError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// The record named in the path does not exist.
    #[error("{0} not found")]
    NotFound(EntityKind),

    /// A reference carried in the payload does not resolve.
    #[error("Referenced {0} not found")]
    MissingReference(EntityKind),

    /// Payload failed field validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A unique field already holds this value. Holds the field name.
    #[error("Duplicate value for {0}")]
    Duplicate(String),

    /// Malformed request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(field) => Self::Duplicate(field),
            other => Self::Database(other),
        }
    }
}

impl AppError {
    /// Map `RepositoryError::NotFound` to a 404 for `kind`.
    pub(crate) fn from_repository(kind: EntityKind) -> impl FnOnce(RepositoryError) -> Self {
        move |err| match err {
            RepositoryError::NotFound => Self::NotFound(kind),
            other => other.into(),
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MissingReference(_)
            | Self::Validation(_)
            | Self::Duplicate(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message sent to the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            // Don't expose internal error details to clients
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::NotFound(kind) | Self::MissingReference(kind) => format!("{kind} not found"),
            Self::BadRequest(msg) => msg.clone(),
            Self::Validation(_) | Self::Duplicate(_) => self.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            message: self.client_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_message(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json["message"].as_str().unwrap().to_owned())
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::NotFound(EntityKind::Pet).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::MissingReference(EntityKind::Owner).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Duplicate("email".to_owned()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".to_owned()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_conflict_maps_to_duplicate() {
        let err: AppError = RepositoryError::Conflict("licenseNumber".to_owned()).into();
        assert!(matches!(err, AppError::Duplicate(ref f) if f == "licenseNumber"));
        assert_eq!(err.client_message(), "Duplicate value for licenseNumber");
    }

    #[test]
    fn test_from_repository_not_found() {
        let err = AppError::from_repository(EntityKind::Visit)(RepositoryError::NotFound);
        assert!(matches!(err, AppError::NotFound(EntityKind::Visit)));
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, message) = body_message(AppError::NotFound(EntityKind::Owner)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Owner not found");
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let err = AppError::Database(RepositoryError::DataCorruption("bad row".to_owned()));
        let (status, message) = body_message(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");
    }

    #[tokio::test]
    async fn test_validation_message_carries_cause() {
        let err = AppError::Validation(ValidationError::Required {
            entity: EntityKind::Pet,
            field: "name",
        });
        let (status, message) = body_message(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Pet validation failed: name is required");
    }
}
