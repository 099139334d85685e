//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown account, banned account or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account name already registered
    #[error("Account name already exists")]
    AccountNameTaken,

    /// Account name or password does not match the allowed format
    #[error("Invalid credential format")]
    InvalidFormat,

    /// Operation requires a logged-in account
    #[error("Login required")]
    LoginRequired,

    /// Logged-in account lacks the required authority
    #[error("Insufficient authority")]
    Forbidden,

    /// Submitted CSRF token does not match the session's token
    #[error("CSRF token mismatch")]
    CsrfMismatch,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::LoginRequired => StatusCode::UNAUTHORIZED,
            AuthError::AccountNameTaken => StatusCode::CONFLICT,
            AuthError::InvalidFormat => StatusCode::BAD_REQUEST,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::CsrfMismatch => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::LoginRequired => ErrorKind::Unauthorized,
            AuthError::AccountNameTaken => ErrorKind::Conflict,
            AuthError::InvalidFormat => ErrorKind::BadRequest,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::CsrfMismatch => ErrorKind::UnprocessableEntity,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::CsrfMismatch => {
                tracing::warn!("CSRF token mismatch");
            }
            AuthError::Forbidden => {
                tracing::warn!("Moderation attempted without authority");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
