//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use frontdesk_types::error::ServiceError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors surfaced by the service facades.
    Service(ServiceError),
    /// Request-shape validation failure (bad UUID, unknown filter value).
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::Service(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Service(ServiceError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Service(ServiceError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} '{id}' not found"),
            ),
            AppError::Service(ServiceError::InvalidTransition(msg)) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", msg.clone())
            }
            AppError::Service(e @ ServiceError::Storage { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_types::error::RepositoryError;

    #[test]
    fn status_mapping() {
        let cases = [
            (
                AppError::Service(ServiceError::Validation("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Service(ServiceError::not_found("chat", "abc")),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Service(ServiceError::InvalidTransition("closed".into())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Service(ServiceError::Storage {
                    operation: "get_chat".into(),
                    source: RepositoryError::Query("boom".into()),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Validation("bad uuid".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
