//! In-Memory Repository Implementations
//!
//! Single-process maps behind `tokio::sync::RwLock`. Every repository
//! method takes the lock once, so each mutation is one critical section.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entity::{credential::CredentialRecord, session::Session};
use crate::domain::repository::{CredentialRepository, SessionRepository};
use crate::domain::value_object::{
    session_id::SessionId, user_name::UserName, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Credentials
// ============================================================================

/// In-memory credential repository
#[derive(Clone, Default)]
pub struct MemoryCredentialRepository {
    records: Arc<RwLock<HashMap<UserName, CredentialRecord>>>,
}

impl MemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl CredentialRepository for MemoryCredentialRepository {
    async fn insert(&self, record: &CredentialRecord) -> AuthResult<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.principal.username) {
            return Err(AuthError::DuplicateUser);
        }
        records.insert(record.principal.username.clone(), record.clone());
        Ok(())
    }

    async fn find(&self, username: &UserName) -> AuthResult<Option<CredentialRecord>> {
        Ok(self.records.read().await.get(username).cloned())
    }

    async fn exists(&self, username: &UserName) -> AuthResult<bool> {
        Ok(self.records.read().await.contains_key(username))
    }

    async fn update_password(
        &self,
        username: &UserName,
        password_hash: &UserPassword,
    ) -> AuthResult<bool> {
        let mut records = self.records.write().await;
        match records.get_mut(username) {
            Some(record) => {
                record.rotate(password_hash.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, username: &UserName) -> AuthResult<bool> {
        Ok(self.records.write().await.remove(username).is_some())
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// In-memory session repository
#[derive(Clone, Default)]
pub struct MemorySessionRepository {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl SessionRepository for MemorySessionRepository {
    async fn insert(&self, session: &Session) -> AuthResult<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.session_id) {
            // 256-bit ids; a collision means the RNG is broken
            return Err(AuthError::Internal("Session id collision".to_string()));
        }
        sessions.insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn find(&self, session_id: &SessionId) -> AuthResult<Option<Session>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn touch(&self, session_id: &SessionId, at: DateTime<Utc>) -> AuthResult<()> {
        if let Some(session) = self.sessions.write().await.get_mut(session_id) {
            session.touch(at);
        }
        Ok(())
    }

    async fn delete(&self, session_id: &SessionId) -> AuthResult<bool> {
        Ok(self.sessions.write().await.remove(session_id).is_some())
    }

    async fn delete_all_for_user(&self, username: &UserName) -> AuthResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| &session.username != username);
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        Ok((before - sessions.len()) as u64)
    }
}
