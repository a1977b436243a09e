//! Error types for Libris server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Application error codes exposed in API error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchBook = 4,
    NoSuchMember = 5,
    NoSuchBorrowing = 6,
    OutOfStock = 7,
    AlreadyReturned = 8,
    Conflict = 9,
    BadValue = 10,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Book with id {0} not found")]
    BookNotFound(i64),

    #[error("Member with id {0} not found")]
    MemberNotFound(i64),

    #[error("Borrowing with id {0} not found")]
    BorrowingNotFound(Uuid),

    #[error("Book with id {0} has no available copies")]
    OutOfStock(i64),

    #[error("Borrowing with id {0} is already returned")]
    AlreadyReturned(Uuid),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::BookNotFound(_)
            | AppError::MemberNotFound(_)
            | AppError::BorrowingNotFound(_) => StatusCode::NOT_FOUND,
            AppError::OutOfStock(_)
            | AppError::AlreadyReturned(_)
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            AppError::Authentication(_) | AppError::Authorization(_) => ErrorCode::NotAuthorized,
            AppError::BookNotFound(_) => ErrorCode::NoSuchBook,
            AppError::MemberNotFound(_) => ErrorCode::NoSuchMember,
            AppError::BorrowingNotFound(_) => ErrorCode::NoSuchBorrowing,
            AppError::OutOfStock(_) => ErrorCode::OutOfStock,
            AppError::AlreadyReturned(_) => ErrorCode::AlreadyReturned,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::Validation(_) | AppError::BadRequest(_) => ErrorCode::BadValue,
            AppError::Database(_) => ErrorCode::DbFailure,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let code = self.code();
        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (self.status(), body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_errors_map_to_404() {
        assert_eq!(AppError::BookNotFound(1).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::MemberNotFound(1).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::BorrowingNotFound(Uuid::nil()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn business_conflicts_map_to_409() {
        assert_eq!(AppError::OutOfStock(1).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::AlreadyReturned(Uuid::nil()).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn conflict_codes_are_distinguishable() {
        assert_ne!(
            AppError::OutOfStock(1).code() as u32,
            AppError::AlreadyReturned(Uuid::nil()).code() as u32
        );
    }
}
