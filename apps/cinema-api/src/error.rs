//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Cinema API                         │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Bad JSON / bad path id? ─── JsonRejection / PathRejection ──┐         │
//! │         │                                                     │         │
//! │         ▼                                                     ▼         │
//! │  Store error? ─── DbError::Rule(CoreError) ── kind() ──► ApiError ────► │
//! │         │                                                     ▲         │
//! │         ▼                                                     │         │
//! │  Storage failure? ─── DbError::QueryFailed ── logged ─────────┘         │
//! │                                                                         │
//! │  Response body: { "code": "CONFLICT", "message": "..." }               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cinema_core::{CoreError, ErrorKind};
use cinema_db::DbError;
use serde::Serialize;
use tracing::error;

/// Error returned from every handler.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Movie with ID 7 not found"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Server-side cause, logged but never sent
    #[serde(skip)]
    detail: Option<String>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced resource does not exist (404)
    NotFound,

    /// Uniqueness, overlap or guarded delete (409)
    Conflict,

    /// Malformed input or broken business rule (400)
    BadRequest,

    /// Storage failure (500)
    InternalServerError,

    /// Database not reachable (503)
    ServiceUnavailable,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::Conflict => ErrorCode::Conflict,
            ErrorKind::BadRequest => ErrorCode::BadRequest,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            detail: None,
        }
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    /// Creates an internal error; `detail` is logged, not returned.
    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError {
            code: ErrorCode::InternalServerError,
            message: "Internal server error".to_string(),
            detail: Some(detail.into()),
        }
    }

    /// Creates a service unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ServiceUnavailable, message)
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(
                status = %status,
                message = %self.message,
                detail = self.detail.as_deref().unwrap_or("-"),
                "Request failed on the server side"
            );
        }

        (status, Json(self)).into_response()
    }
}

/// Converts business-rule errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::new(err.kind().into(), err.to_string())
    }
}

/// Converts database errors to API errors.
///
/// Rule violations and constraint hits keep their message; anything else
/// becomes a generic 500.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err.kind() {
            Some(kind) => ApiError::new(kind.into(), err.to_string()),
            None => ApiError::internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

// =============================================================================
// Extractors
// =============================================================================

/// JSON body extractor whose rejections render as [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections render as [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use cinema_core::ValidationError;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::MovieNotFound(7).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Movie with ID 7 not found");

        let err: ApiError = CoreError::DuplicateTitle {
            title: "Dune".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = CoreError::Validation(ValidationError::Required {
            field: "title".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::Rule(CoreError::ShowtimeNotFound(3)).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = DbError::duplicate("seat_number", "A1").into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::internal("secret detail");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "code": "INTERNAL_SERVER_ERROR",
                "message": "Internal server error",
            })
        );
    }
}
