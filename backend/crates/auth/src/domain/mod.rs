//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    credential::CredentialRecord,
    principal::Principal,
    session::{ExpiryPolicy, Session},
};
pub use repository::{CredentialRepository, SessionRepository};
pub use value_object::{session_id::SessionId, user_name::UserName};
