//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Credential store, session store, authenticator
//! - `infra/` - In-memory and PostgreSQL repositories
//! - `presentation/` - HTTP handlers, DTOs, router, guard middleware
//!
//! ## Features
//! - Registration and login with username + password
//! - Server-side sessions referenced by a signed cookie
//! - Idle timeout, optional absolute lifetime, periodic sweeping
//! - Guard for protected routes (401 or redirect to login)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Unknown user and wrong password fail identically, at the same cost
//! - Session ids are 256-bit random values; cookies carry an HMAC-SHA256 tag
//! - Sessions die with their principal

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    Authenticator, CredentialStore, SessionStore, config::AuthConfig, config::GuardPolicy,
    spawn_session_sweeper,
};
pub use error::{AuthError, AuthResult};
pub use infra::{MemoryCredentialRepository, MemorySessionRepository, PgCredentialRepository};
pub use presentation::router::{auth_router, memory_auth_router, protect, with_sessions};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
