//! Auth Middleware
//!
//! Session resolution and the guard for protected routes.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::application::config::{AuthConfig, GuardPolicy};
use crate::domain::entity::principal::Principal;
use crate::domain::repository::{CredentialRepository, SessionRepository};
use crate::domain::value_object::session_id::SessionId;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Principal of the current request, `None` when anonymous
///
/// Inserted into request extensions by [`resolve_session`].
#[derive(Debug, Clone, Default)]
pub struct CurrentPrincipal(pub Option<Principal>);

impl CurrentPrincipal {
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

/// Read and verify the session cookie
///
/// Missing, tampered and malformed cookies all yield `None`.
pub fn session_id_from_headers(headers: &HeaderMap, config: &AuthConfig) -> Option<SessionId> {
    let token = platform::cookie::extract_cookie(headers, &config.session_cookie_name)?;
    let signer = config.token_signer();

    let Some(value) = signer.verify(&token) else {
        tracing::debug!("Session cookie failed signature check");
        return None;
    };

    SessionId::parse(value)
}

/// Middleware that resolves the session cookie to a principal
///
/// Never rejects; anonymous requests get `CurrentPrincipal(None)`.
pub async fn resolve_session<C, S>(
    State(state): State<AuthAppState<C, S>>,
    mut req: Request,
    next: Next,
) -> Response
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    let current = current_principal(&state, req.headers()).await;
    req.extensions_mut().insert(current);

    next.run(req).await
}

/// Middleware that requires a valid session
///
/// Resolves the session itself when [`resolve_session`] did not run.
pub async fn require_authenticated<C, S>(
    State(state): State<AuthAppState<C, S>>,
    mut req: Request,
    next: Next,
) -> Response
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    let authenticated = match req.extensions().get::<CurrentPrincipal>() {
        Some(current) => current.is_authenticated(),
        None => {
            let current = current_principal(&state, req.headers()).await;
            let authenticated = current.is_authenticated();
            req.extensions_mut().insert(current);
            authenticated
        }
    };

    if !authenticated {
        return deny(&state.config);
    }

    next.run(req).await
}

/// Response for an anonymous request on a protected route
pub fn deny(config: &AuthConfig) -> Response {
    match config.guard_policy {
        GuardPolicy::Unauthorized => {
            (StatusCode::UNAUTHORIZED, [("X-Auth-Required", "true")]).into_response()
        }
        GuardPolicy::RedirectToLogin => Redirect::to(&config.login_path).into_response(),
    }
}

async fn current_principal<C, S>(state: &AuthAppState<C, S>, headers: &HeaderMap) -> CurrentPrincipal
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    let Some(session_id) = session_id_from_headers(headers, &state.config) else {
        return CurrentPrincipal(None);
    };

    match state.authenticator.current_principal(&session_id).await {
        Ok(principal) => CurrentPrincipal(principal),
        Err(e) => {
            // Treated as anonymous; protected routes deny
            tracing::error!(session = %session_id, error = %e, "Session lookup failed");
            CurrentPrincipal(None)
        }
    }
}

/// Extractor for handlers behind the guard
///
/// Rejects with 401 when no principal was resolved.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

impl<St> FromRequestParts<St> for AuthenticatedPrincipal
where
    St: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<CurrentPrincipal>() {
            Some(CurrentPrincipal(Some(principal))) => Ok(Self(principal.clone())),
            _ => Err(AuthError::Unauthenticated),
        }
    }
}
