//! Feed Error Types
//!
//! Feed-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_objects::CursorError;

/// Feed-specific result type alias
pub type FeedResult<T> = Result<T, FeedError>;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Post, image or account not found
    #[error("Not found")]
    NotFound,

    /// Unparseable `max_created_at`
    #[error(transparent)]
    InvalidCursor(#[from] CursorError),

    /// Non-numeric `post_id`
    #[error("post_id must be a positive integer")]
    InvalidPostId,

    /// Malformed form or multipart body
    #[error("Invalid form: {0}")]
    InvalidForm(String),

    /// Session gate rejection (login required, CSRF mismatch)
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FeedError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            FeedError::NotFound => StatusCode::NOT_FOUND,
            FeedError::InvalidCursor(_) | FeedError::InvalidPostId | FeedError::InvalidForm(_) => {
                StatusCode::BAD_REQUEST
            }
            FeedError::Auth(e) => e.status_code(),
            FeedError::Database(_) | FeedError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedError::NotFound => ErrorKind::NotFound,
            FeedError::InvalidCursor(_) | FeedError::InvalidPostId | FeedError::InvalidForm(_) => {
                ErrorKind::BadRequest
            }
            FeedError::Auth(e) => e.kind(),
            FeedError::Database(_) | FeedError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            FeedError::Database(e) => {
                tracing::error!(error = %e, "Feed database error");
            }
            FeedError::Internal(msg) => {
                tracing::error!(message = %msg, "Feed internal error");
            }
            FeedError::InvalidPostId | FeedError::InvalidCursor(_) | FeedError::InvalidForm(_) => {
                tracing::warn!(error = %self, "Rejected feed request");
            }
            _ => {
                tracing::debug!(error = %self, "Feed error");
            }
        }
    }
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        match self {
            // Anonymous writes are sent to the login page
            FeedError::Auth(AuthError::LoginRequired) => auth::response::found("/login"),
            FeedError::Auth(e) => e.into_response(),
            other => {
                other.log();
                other.to_app_error().into_response()
            }
        }
    }
}

impl From<AppError> for FeedError {
    fn from(err: AppError) -> Self {
        FeedError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_status_codes() {
        assert_eq!(FeedError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(FeedError::InvalidPostId.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            FeedError::InvalidCursor(CursorError("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FeedError::Auth(AuthError::CsrfMismatch).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_login_required_redirects() {
        let response = FeedError::Auth(AuthError::LoginRequired).into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[test]
    fn test_csrf_mismatch_is_422() {
        let response = FeedError::Auth(AuthError::CsrfMismatch).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_internal_is_500() {
        let response = FeedError::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
