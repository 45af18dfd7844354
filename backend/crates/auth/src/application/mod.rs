//! Application Layer
//!
//! Stores and the authenticator built on the repository traits.

pub mod authenticator;
pub mod config;
pub mod credential_store;
pub mod session_store;

// Re-exports
pub use authenticator::Authenticator;
pub use config::{AuthConfig, GuardPolicy};
pub use credential_store::CredentialStore;
pub use session_store::{SessionStore, spawn_session_sweeper};
