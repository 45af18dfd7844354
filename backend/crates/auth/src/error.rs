//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Generic message for every credential failure
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// User name already registered (registration only)
    #[error("User name is not available")]
    DuplicateUser,

    /// Unknown user or wrong password; deliberately indistinguishable
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Session expired")]
    SessionExpired,

    /// No valid session on a protected route
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid user name: {0}")]
    InvalidUserName(String),

    #[error("Password validation failed: {0}")]
    PasswordPolicy(String),

    /// Backing store could not be reached or failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DuplicateUser => StatusCode::CONFLICT,
            AuthError::InvalidCredentials
            | AuthError::SessionNotFound
            | AuthError::SessionExpired
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::InvalidUserName(_) | AuthError::PasswordPolicy(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::DuplicateUser => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::SessionNotFound
            | AuthError::SessionExpired
            | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::InvalidUserName(_) | AuthError::PasswordPolicy(_) => ErrorKind::BadRequest,
            AuthError::StoreUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Session-level failures that callers only see as "not logged in"
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AuthError::SessionNotFound | AuthError::SessionExpired | AuthError::Unauthenticated
        )
    }

    /// Convert to AppError
    ///
    /// Server-side details stay in the logs; clients get the kind's phrase.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::StoreUnavailable(_) => {
                AppError::service_unavailable("Authentication service temporarily unavailable")
                    .with_action("Please try again later")
            }
            AuthError::Internal(_) => AppError::internal("Internal error"),
            AuthError::SessionNotFound | AuthError::SessionExpired => {
                AppError::unauthorized("Authentication required")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::StoreUnavailable(msg) => {
                tracing::error!(message = %msg, "Auth store unavailable");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
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

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AuthError::DuplicateUser
            }
            _ => AuthError::StoreUnavailable(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("Background task failed: {err}"))
    }
}
