//! Application Error - Unified error type for the gateway
//!
//! Defines [`AppError`] and [`AppResult<T>`]. Crate-specific errors
//! (e.g. `auth::AuthError`) convert into this type when rendered as HTTP.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// Unified application error
///
/// Carries a classification, a user-facing message and an optional hint on
/// what the user should do next.
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::Unauthorized, "Login required")
///     .with_action("Sign in and retry");
/// assert_eq!(err.status_code(), 401);
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    action: Option<Cow<'static, str>>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
        }
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    #[inline]
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    #[inline]
    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Attach a hint describing what the user should do next
    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(action) = &self.action {
            builder.field("action", action);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::Conflict, "User already exists");
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.message(), "User already exists");
        assert!(err.action().is_none());
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(AppError::unauthorized("x").status_code(), 401);
        assert_eq!(AppError::internal("x").status_code(), 500);
        assert_eq!(AppError::service_unavailable("x").status_code(), 503);
    }

    #[test]
    fn test_display_includes_action() {
        let err = AppError::unauthorized("Login required").with_action("Sign in");
        assert_eq!(
            err.to_string(),
            "[Unauthorized] Login required (Action: Sign in)"
        );
    }
}
