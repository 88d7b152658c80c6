//! Error types for Bookshelf server

use axum::{
    extract::rejection::{FormRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric codes reported by the JSON API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 2,
    NoSuchBook = 3,
    BadValue = 4,
    BadInput = 5,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// A field value was rejected; nothing was written
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required parameter is missing or malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status, code and caller-facing message for this error.
    ///
    /// Server-side failures are logged here and replaced with a generic
    /// message so backend diagnostics never reach the client.
    pub fn classify(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BadValue,
                format!("Validation Error: {}", msg),
            ),
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadInput, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook, msg.clone()),
            AppError::Storage(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Session(msg) => {
                tracing::error!("Session error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Session storage unavailable".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Extractor rejections
// ---------------------------------------------------------------------------

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(rejection.into())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(rejection.into())
    }
}

/// HTML pages render errors through the view layer
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _, message) = self.classify();
        crate::view::BookView::error(status, &message)
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

/// JSON flavour of [`AppError`] used by the `/api/v1` endpoints
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.0.classify();

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for JSON API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let (status, code, message) = AppError::InvalidInput("Valid book ID is required".into()).classify();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, ErrorCode::BadInput);
        assert_eq!(message, "Valid book ID is required");

        let (status, _, message) = AppError::Validation("Invalid book data".into()).classify();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Validation Error: Invalid book data");
    }

    #[test]
    fn storage_errors_hide_backend_details() {
        let (status, code, message) = AppError::Storage(sqlx::Error::PoolTimedOut).classify();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, ErrorCode::DbFailure);
        assert_eq!(message, "Database error");
    }

    #[test]
    fn error_codes_are_dense() {
        let codes = [
            ErrorCode::Failure,
            ErrorCode::DbFailure,
            ErrorCode::NoSuchBook,
            ErrorCode::BadValue,
            ErrorCode::BadInput,
        ];
        let numbers: Vec<u32> = codes.iter().map(|c| *c as u32).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn not_found_maps_to_404() {
        let (status, _, _) = AppError::NotFound("Book not found".into()).classify();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
