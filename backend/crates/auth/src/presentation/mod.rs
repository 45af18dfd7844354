//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{
    AuthenticatedPrincipal, CurrentPrincipal, require_authenticated, resolve_session,
};
pub use router::{auth_router, memory_auth_router, protect, with_sessions};
