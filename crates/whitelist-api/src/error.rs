//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use whitelist_core::error::DomainError;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection, pool or migration error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// Tracing or trace export could not be set up or flushed.
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// A domain failure.
    Domain(DomainError),
    /// The actor may not perform the request.
    Forbidden(String),
    /// The request is malformed outside the domain's own validation.
    BadRequest(String),
    /// A resource that is not an application id was not found.
    NotFound(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::Domain(err) => {
                let (status, code) = match &err {
                    DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
                    DomainError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
                    DomainError::InvalidTransition { .. } => {
                        (StatusCode::CONFLICT, "invalid_transition")
                    }
                    DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                    DomainError::Dependency(_) => {
                        warn!(error = %err, "dependency failure");
                        (StatusCode::BAD_GATEWAY, "dependency_error")
                    }
                    DomainError::Infrastructure(_) => {
                        error!(error = %err, "infrastructure failure");
                        (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
                    }
                };
                (status, code, err.to_string())
            }
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, "forbidden", message),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use whitelist_core::model::ApplicationStatus;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        let response = err.into().into_response();
        response.status()
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::validation("platform", "unknown platform 'switch'")),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_conflict_maps_to_409() {
        assert_eq!(
            status_of(DomainError::Conflict("already pending".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_invalid_transition_maps_to_409() {
        assert_eq!(
            status_of(DomainError::InvalidTransition {
                application_id: 3,
                status: ApplicationStatus::Approved,
                action: "reject",
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(status_of(DomainError::NotFound(9)), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_dependency_maps_to_502() {
        assert_eq!(
            status_of(DomainError::Dependency("steam down".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(DomainError::Infrastructure("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_http_only_errors() {
        assert_eq!(
            status_of(ApiError::Forbidden("nope".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ApiError::BadRequest("missing header".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::NotFound("no application".into())),
            StatusCode::NOT_FOUND
        );
    }
}
