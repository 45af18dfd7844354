//! Session Store
//!
//! Maps opaque session ids to principals and enforces expiry.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::entity::{
    principal::Principal,
    session::{ExpiryPolicy, Session},
};
use crate::domain::repository::{CredentialRepository, SessionRepository};
use crate::domain::value_object::{session_id::SessionId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Session store
///
/// Holds the credential repository as well: a session is only valid while
/// its principal exists.
pub struct SessionStore<S, C>
where
    S: SessionRepository + Send + Sync + 'static,
    C: CredentialRepository + Send + Sync + 'static,
{
    sessions: Arc<S>,
    credentials: Arc<C>,
    policy: ExpiryPolicy,
}

impl<S, C> Clone for SessionStore<S, C>
where
    S: SessionRepository + Send + Sync + 'static,
    C: CredentialRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            credentials: self.credentials.clone(),
            policy: self.policy,
        }
    }
}

impl<S, C> SessionStore<S, C>
where
    S: SessionRepository + Send + Sync + 'static,
    C: CredentialRepository + Send + Sync + 'static,
{
    pub fn new(sessions: Arc<S>, credentials: Arc<C>, policy: ExpiryPolicy) -> Self {
        Self {
            sessions,
            credentials,
            policy,
        }
    }

    pub fn policy(&self) -> &ExpiryPolicy {
        &self.policy
    }

    /// Create a session; the record is stored before the id is returned
    pub async fn create(&self, principal: &Principal) -> AuthResult<SessionId> {
        let session = Session::new(principal.username.clone(), &self.policy, Utc::now());
        self.sessions.insert(&session).await?;

        tracing::debug!(
            username = %principal.username,
            session = %session.session_id,
            "Session created"
        );
        Ok(session.session_id)
    }

    /// Resolve a session to its principal
    ///
    /// `None` for unknown, expired or orphaned sessions. Only store
    /// failures are errors.
    pub async fn resolve(&self, session_id: &SessionId) -> AuthResult<Option<Principal>> {
        match self.lookup(session_id).await {
            Ok(principal) => Ok(Some(principal)),
            Err(e) if e.is_unauthenticated() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Destroy a session; destroying an unknown session is not an error
    pub async fn destroy(&self, session_id: &SessionId) -> AuthResult<bool> {
        let removed = self.sessions.delete(session_id).await?;
        tracing::debug!(session = %session_id, removed, "Session destroyed");
        Ok(removed)
    }

    /// Destroy every session of one principal
    pub async fn destroy_all_for(&self, username: &UserName) -> AuthResult<u64> {
        let removed = self.sessions.delete_all_for_user(username).await?;
        if removed > 0 {
            tracing::info!(username = %username, removed, "Sessions destroyed for user");
        }
        Ok(removed)
    }

    /// Remove sessions that have expired
    pub async fn purge_expired(&self) -> AuthResult<u64> {
        self.sessions.delete_expired(Utc::now()).await
    }

    async fn lookup(&self, session_id: &SessionId) -> AuthResult<Principal> {
        let now = Utc::now();

        let session = self
            .sessions
            .find(session_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if session.is_expired_at(now) {
            self.discard(session_id).await;
            tracing::debug!(session = %session_id, "Expired session removed");
            return Err(AuthError::SessionExpired);
        }

        let Some(record) = self.credentials.find(&session.username).await? else {
            self.discard(session_id).await;
            tracing::info!(
                username = %session.username,
                session = %session_id,
                "Session of removed principal discarded"
            );
            return Err(AuthError::SessionNotFound);
        };

        if self.policy.sliding {
            self.sessions.touch(session_id, now).await?;
        }

        Ok(record.principal)
    }

    /// Best-effort removal of a session already judged invalid.
    /// The sweeper retries whatever is left behind.
    async fn discard(&self, session_id: &SessionId) {
        if let Err(e) = self.sessions.delete(session_id).await {
            tracing::warn!(session = %session_id, error = %e, "Failed to remove invalid session");
        }
    }
}

/// Spawn a task that purges expired sessions every `period`
pub fn spawn_session_sweeper<S, C>(store: SessionStore<S, C>, period: Duration) -> JoinHandle<()>
where
    S: SessionRepository + Send + Sync + 'static,
    C: CredentialRepository + Send + Sync + 'static,
{
    let period = period.max(Duration::from_secs(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(sessions_deleted = purged, "Purged expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Session sweep failed"),
            }
        }
    })
}
