//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{CredentialRepository, SessionRepository};
use crate::infra::memory::{MemoryCredentialRepository, MemorySessionRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{require_authenticated, resolve_session};

/// Create the auth router for any repository implementation
///
/// `/login`, `/logout` and `/register` are public; `/user` is protected.
/// Every route sees the resolved [`CurrentPrincipal`](super::middleware::CurrentPrincipal).
pub fn auth_router<C, S>(state: AuthAppState<C, S>) -> Router
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    let protected = protect(Router::new().route("/user", get(handlers::user)), state.clone());

    let router = Router::new()
        .route("/login", post(handlers::login::<C, S>))
        .route("/logout", get(handlers::logout::<C, S>))
        .route(handlers::REGISTER_PATH, post(handlers::register::<C, S>))
        .merge(protected);

    with_sessions(router, state.clone()).with_state(state)
}

/// Auth router over in-memory credentials and sessions
pub fn memory_auth_router(config: AuthConfig) -> Router {
    let state = AuthAppState::new(
        Arc::new(MemoryCredentialRepository::new()),
        Arc::new(MemorySessionRepository::new()),
        config,
    );
    auth_router(state)
}

/// Put every route of `router` behind the guard
pub fn protect<T, C, S>(router: Router<T>, state: AuthAppState<C, S>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(
        state,
        require_authenticated::<C, S>,
    ))
}

/// Resolve the session cookie for every request to `router`
pub fn with_sessions<T, C, S>(router: Router<T>, state: AuthAppState<C, S>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(state, resolve_session::<C, S>))
}
