/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which converts to the
/// appropriate HTTP status code.
///
/// Domain errors from the shared services convert into `ApiError` via
/// `From` impls, so the outward mapping lives in one place and is
/// exhaustive over the service error kinds:
///
/// | Core outcome | Status |
/// |---|---|
/// | invalid time / interval / self-booking | 400 |
/// | field validation failure | 422 |
/// | missing user or appointment | 404 |
/// | booking conflict, duplicate email | 409 |
/// | storage / commit failure | 500 (opaque) |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use meetslot_shared::service::booking::BookingError;
use meetslot_shared::service::users::UserError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - overlapping booking or duplicate email
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "conflict")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert booking errors to API errors
impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::SelfBooking
            | BookingError::InvalidTimeFormat { .. }
            | BookingError::InvalidInterval => ApiError::BadRequest(err.to_string()),
            BookingError::ParticipantNotFound | BookingError::NotFound => {
                ApiError::NotFound(err.to_string())
            }
            // Genuine overlap conflicts are 409; scan failures stay 500.
            BookingError::Conflict { .. } => ApiError::Conflict(err.to_string()),
            BookingError::CreateFailed(source) => {
                ApiError::InternalError(format!("failed to create appointment: {}", source))
            }
            BookingError::CommitFailed(source) => {
                ApiError::InternalError(format!("failed to commit appointment: {}", source))
            }
            BookingError::Store(source) => ApiError::InternalError(source.to_string()),
        }
    }
}

/// Convert user errors to API errors
impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => ApiError::NotFound(err.to_string()),
            UserError::EmailExists => ApiError::Conflict(err.to_string()),
            UserError::CreateFailed(source) => {
                ApiError::InternalError(format!("failed to create user: {}", source))
            }
            UserError::Store(source) => ApiError::InternalError(source.to_string()),
        }
    }
}

/// Convert validator errors to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetslot_shared::store::StoreError;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_booking_error_statuses() {
        let cases = [
            (ApiError::from(BookingError::SelfBooking), StatusCode::BAD_REQUEST),
            (
                ApiError::from(BookingError::InvalidTimeFormat { field: "start_time" }),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(BookingError::InvalidInterval),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(BookingError::ParticipantNotFound),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(BookingError::Conflict { ids: vec![7] }),
                StatusCode::CONFLICT,
            ),
            (ApiError::from(BookingError::NotFound), StatusCode::NOT_FOUND),
            (
                ApiError::from(BookingError::CreateFailed(StoreError::Backend(
                    "boom".to_string(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(BookingError::CommitFailed(StoreError::Backend(
                    "boom".to_string(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_user_error_statuses() {
        assert_eq!(
            ApiError::from(UserError::EmailExists).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(UserError::NotFound).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(UserError::Store(StoreError::Backend("boom".to_string())))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let response =
            ApiError::InternalError("connection reset by peer".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // The body carries a generic message; internals stay in the logs.
    }
}
