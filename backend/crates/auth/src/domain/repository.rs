//! Repository Traits
//!
//! Interfaces for persistence. Implementations are in the infra layer.
//! Every method is a single atomic step: a caller that is cancelled after
//! the call started sees either the whole mutation or none of it.

use chrono::{DateTime, Utc};

use crate::domain::entity::{credential::CredentialRecord, session::Session};
use crate::domain::value_object::{
    session_id::SessionId, user_name::UserName, user_password::UserPassword,
};
use crate::error::AuthResult;

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Insert a new record; `AuthError::DuplicateUser` if the name is taken
    async fn insert(&self, record: &CredentialRecord) -> AuthResult<()>;

    /// Find a record by exact user name
    async fn find(&self, username: &UserName) -> AuthResult<Option<CredentialRecord>>;

    /// Check whether a user name is registered
    async fn exists(&self, username: &UserName) -> AuthResult<bool>;

    /// Replace the password hash; `false` if the user does not exist
    async fn update_password(
        &self,
        username: &UserName,
        password_hash: &UserPassword,
    ) -> AuthResult<bool>;

    /// Remove the account; `false` if it did not exist
    async fn delete(&self, username: &UserName) -> AuthResult<bool>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Store a new session
    async fn insert(&self, session: &Session) -> AuthResult<()>;

    /// Find session by ID
    async fn find(&self, session_id: &SessionId) -> AuthResult<Option<Session>>;

    /// Update last access time
    async fn touch(&self, session_id: &SessionId, at: DateTime<Utc>) -> AuthResult<()>;

    /// Delete a session; `false` if it was already gone
    async fn delete(&self, session_id: &SessionId) -> AuthResult<bool>;

    /// Delete every session of one user
    async fn delete_all_for_user(&self, username: &UserName) -> AuthResult<u64>;

    /// Delete sessions that are expired at `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}
