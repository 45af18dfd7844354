//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered
//! by `auth::AuthError` through `kernel::error::AppError`.

mod config;

use auth::domain::repository::{CredentialRepository, SessionRepository};
use auth::middleware::CurrentPrincipal;
use auth::presentation::{AuthAppState, handlers};
use auth::{
    MemoryCredentialRepository, MemorySessionRepository, PgCredentialRepository, protect,
    spawn_session_sweeper, with_sessions,
};
use axum::extract::{Extension, Query};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let sessions = Arc::new(MemorySessionRepository::new());

    match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let credentials = Arc::new(PgCredentialRepository::new(pool));
            serve(config, credentials, sessions).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set, credentials are kept in memory");
            let credentials = Arc::new(MemoryCredentialRepository::new());
            serve(config, credentials, sessions).await
        }
    }
}

async fn serve<C, S>(config: ServerConfig, credentials: Arc<C>, sessions: Arc<S>) -> anyhow::Result<()>
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    let sweep_interval = config.auth.session_sweep_interval;
    let state = AuthAppState::new(credentials, sessions, config.auth);

    let sweeper = spawn_session_sweeper(state.authenticator.sessions().clone(), sweep_interval);

    let app = app_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sweeper.abort();
    tracing::info!("Shutdown complete");

    Ok(())
}

fn app_router<C, S>(state: AuthAppState<C, S>) -> Router
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    let protected = protect(
        Router::new()
            .route("/user", get(handlers::user))
            .route("/private", get(private_page)),
        state.clone(),
    );

    let router = Router::new()
        .route("/", get(home_page))
        .route(
            "/login",
            get(login_page).post(handlers::login::<C, S>),
        )
        .route("/logout", get(handlers::logout::<C, S>))
        .route(
            handlers::REGISTER_PATH,
            get(register_page).post(handlers::register::<C, S>),
        )
        .route("/health", get(health))
        .merge(protected);

    with_sessions(router, state.clone()).with_state(state)
}

// ============================================================================
// Pages
// ============================================================================

#[derive(Deserialize)]
struct InfoQuery {
    info: Option<String>,
}

async fn home_page(Extension(current): Extension<CurrentPrincipal>) -> String {
    match current.0 {
        Some(principal) => format!("Hello, {}", principal.username),
        None => "Hello, guest. Log in at /login".to_string(),
    }
}

async fn login_page(Query(query): Query<InfoQuery>) -> String {
    page(
        "Log in: POST username and password to /login",
        query.info,
    )
}

async fn register_page(Query(query): Query<InfoQuery>) -> String {
    page(
        "Register: POST username, password and optional displayName to /register",
        query.info,
    )
}

async fn private_page(Extension(current): Extension<CurrentPrincipal>) -> String {
    let name = current
        .0
        .map(|principal| principal.username.into_inner())
        .unwrap_or_default();
    format!("Private area of {}", name)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

fn page(text: &str, info: Option<String>) -> String {
    match info {
        Some(info) => format!("{}\n\n{}", info, text),
        None => text.to_string(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
