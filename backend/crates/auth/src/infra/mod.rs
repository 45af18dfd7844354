//! Infrastructure Layer
//!
//! In-memory and PostgreSQL repository implementations.

pub mod memory;
pub mod postgres;

pub use memory::{MemoryCredentialRepository, MemorySessionRepository};
pub use postgres::PgCredentialRepository;
