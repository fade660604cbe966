use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::layout::LayoutError;
use crate::models::path::PathError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<PathError> for AppError {
    fn from(e: PathError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<LayoutError> for AppError {
    fn from(e: LayoutError) -> Self {
        match e {
            LayoutError::UnknownVariant(_) => AppError::NotFound(e.to_string()),
            LayoutError::Inconsistent { .. } => AppError::UnprocessableEntity(e.to_string()),
            LayoutError::InvalidConfiguration { .. } => AppError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_errors_map_to_statuses() {
        let unknown: AppError = LayoutError::UnknownVariant("poster".to_string()).into();
        assert_eq!(unknown.into_response().status(), StatusCode::NOT_FOUND);

        let drift: AppError = LayoutError::Inconsistent { drifts: 3 }.into();
        assert_eq!(drift.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_path_error_is_bad_request() {
        let err: AppError = PathError::Malformed {
            path: "a..b".to_string(),
            reason: "empty key segment".to_string(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
