//! API error types and handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cleanroom::CleanroomError;
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from client.
    BadRequest(String),
    /// Session existed but has expired.
    Gone(String),
    /// Upload larger than the configured limit.
    PayloadTooLarge(String),
    /// Error from the cleanroom library.
    Cleanroom(CleanroomError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Gone(msg) => (StatusCode::GONE, "gone", msg),
            ApiError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg)
            }
            ApiError::Cleanroom(e) => {
                let status = match &e {
                    CleanroomError::ColumnNotFound(_) => StatusCode::NOT_FOUND,
                    CleanroomError::UnsupportedFormat(_)
                    | CleanroomError::Csv(_)
                    | CleanroomError::Spreadsheet(_)
                    | CleanroomError::EmptyData(_)
                    | CleanroomError::RowOutOfRange { .. } => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status.is_server_error() {
                    tracing::error!(error = %e, "request failed");
                }
                (status, "cleanroom_error", e.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<CleanroomError> for ApiError {
    fn from(err: CleanroomError) -> Self {
        ApiError::Cleanroom(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Gone(msg) => write!(f, "Gone: {}", msg),
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            ApiError::Cleanroom(e) => write!(f, "Cleanroom error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
