//! HTTP Handlers

use axum::Json;
use axum::extract::{Form, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use platform::cookie::{delete_cookie_header, set_cookie_header};

use crate::application::Authenticator;
use crate::application::config::AuthConfig;
use crate::domain::repository::{CredentialRepository, SessionRepository};
use crate::error::{AuthError, AuthResult, INVALID_CREDENTIALS_MESSAGE};
use crate::presentation::dto::{LoginForm, RegisterForm, UserResponse};
use crate::presentation::middleware::{AuthenticatedPrincipal, session_id_from_headers};

/// Registration page used by redirects
pub const REGISTER_PATH: &str = "/register";

/// Shared state for auth handlers and middleware
pub struct AuthAppState<C, S>
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    pub authenticator: Authenticator<C, S>,
    pub config: Arc<AuthConfig>,
}

impl<C, S> Clone for AuthAppState<C, S>
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C, S> AuthAppState<C, S>
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    pub fn new(credential_repo: Arc<C>, session_repo: Arc<S>, config: AuthConfig) -> Self {
        let config = Arc::new(config);
        Self {
            authenticator: Authenticator::new(credential_repo, session_repo, config.clone()),
            config,
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<C, S>(
    State(state): State<AuthAppState<C, S>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> AuthResult<Response>
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    let session_id = match state.authenticator.login(&form.username, form.password).await {
        Ok(session_id) => session_id,
        Err(AuthError::InvalidCredentials) => {
            let target = info_location(&state.config.login_path, INVALID_CREDENTIALS_MESSAGE);
            return Ok(Redirect::to(&target).into_response());
        }
        Err(e) => return Err(e),
    };

    // A session the client already carried is replaced, not kept alongside
    if let Some(previous) = session_id_from_headers(&headers, &state.config) {
        state.authenticator.logout(&previous).await;
    }

    // The session is stored by now; only then does the client get the cookie
    let token = state.config.token_signer().sign(session_id.as_str());
    let cookie = set_cookie_header(&state.config.cookie_config(), &token)
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

// ============================================================================
// Logout
// ============================================================================

/// GET /logout
pub async fn logout<C, S>(
    State(state): State<AuthAppState<C, S>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    if let Some(session_id) = session_id_from_headers(&headers, &state.config) {
        // Awaited, so the session is gone before the response leaves
        state.authenticator.logout(&session_id).await;
    }

    let cookie = delete_cookie_header(&state.config.cookie_config())
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(([(header::SET_COOKIE, cookie)], "Logged out"))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /user (protected)
pub async fn user(AuthenticatedPrincipal(principal): AuthenticatedPrincipal) -> Json<UserResponse> {
    Json(UserResponse::from(principal))
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<C, S>(
    State(state): State<AuthAppState<C, S>>,
    Form(form): Form<RegisterForm>,
) -> AuthResult<Redirect>
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    let result = state
        .authenticator
        .register(&form.username, form.password, form.display_name)
        .await;

    let redirect = match result {
        Ok(_) => info_location(&state.config.login_path, "Account created"),
        Err(AuthError::DuplicateUser) => info_location(REGISTER_PATH, "Username is not available"),
        Err(e @ (AuthError::InvalidUserName(_) | AuthError::PasswordPolicy(_))) => {
            info_location(REGISTER_PATH, &e.to_string())
        }
        Err(e) => return Err(e),
    };

    Ok(Redirect::to(&redirect))
}

/// `<path>?info=<message>` with the message form-encoded (spaces as `+`)
fn info_location(path: &str, message: &str) -> String {
    format!("{path}?info={}", urlencoding::encode(message).replace("%20", "+"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_location_form_encodes() {
        assert_eq!(
            info_location("/login", INVALID_CREDENTIALS_MESSAGE),
            "/login?info=Invalid+username+or+password"
        );
        assert_eq!(
            info_location(REGISTER_PATH, "50% off & more"),
            "/register?info=50%25+off+%26+more"
        );
    }
}
