//! Service error taxonomy.
//!
//! Every failure that crosses the task service boundary is one of these
//! kinds. Backend client errors are converted to `BackendUnavailable` at the
//! adapter layer, so raw `redis` error types never reach the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

use crate::backend::BackendError;

/// Error returned by the task service.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The durable store cannot be reached or timed out. Never retried
    /// internally; the caller decides whether to retry.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Lookup of an unknown task id.
    #[error("Task {0} not found")]
    NotFound(String),

    /// Malformed input, rejected before any backend interaction.
    #[error("{0}")]
    Validation(String),
}

impl ServiceError {
    /// Stable machine-readable kind string.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::BackendUnavailable(_) => "backend_unavailable",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Validation(_) => "validation",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<BackendError> for ServiceError {
    fn from(err: BackendError) -> Self {
        ServiceError::BackendUnavailable(err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(
            ServiceError::BackendUnavailable("down".to_string()).kind(),
            "backend_unavailable"
        );
        assert_eq!(ServiceError::NotFound("x".to_string()).kind(), "not_found");
        assert_eq!(
            ServiceError::Validation("bad".to_string()).kind(),
            "validation"
        );
    }

    #[test]
    fn status_codes_match_kinds() {
        assert_eq!(
            ServiceError::BackendUnavailable("down".to_string())
                .into_response()
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServiceError::NotFound("x".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Validation("bad".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn backend_errors_convert_to_unavailable() {
        let err: ServiceError = BackendError::Unavailable("connection refused".to_string()).into();
        assert!(matches!(err, ServiceError::BackendUnavailable(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
