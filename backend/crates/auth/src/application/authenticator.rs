//! Authenticator
//!
//! Orchestrates the credential and session stores:
//! `Anonymous -> login -> Authenticated -> logout | expiry | removal -> Anonymous`.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::credential_store::CredentialStore;
use crate::application::session_store::SessionStore;
use crate::domain::entity::principal::Principal;
use crate::domain::repository::{CredentialRepository, SessionRepository};
use crate::domain::value_object::{session_id::SessionId, user_name::UserName};
use crate::error::AuthResult;

pub struct Authenticator<C, S>
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    credentials: CredentialStore<C>,
    sessions: SessionStore<S, C>,
}

impl<C, S> Clone for Authenticator<C, S>
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            credentials: self.credentials.clone(),
            sessions: self.sessions.clone(),
        }
    }
}

impl<C, S> Authenticator<C, S>
where
    C: CredentialRepository + Send + Sync + 'static,
    S: SessionRepository + Send + Sync + 'static,
{
    pub fn new(credential_repo: Arc<C>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        let policy = config.expiry_policy();
        Self {
            credentials: CredentialStore::new(credential_repo.clone(), config),
            sessions: SessionStore::new(session_repo, credential_repo, policy),
        }
    }

    pub fn credentials(&self) -> &CredentialStore<C> {
        &self.credentials
    }

    pub fn sessions(&self) -> &SessionStore<S, C> {
        &self.sessions
    }

    pub async fn register(
        &self,
        username: &str,
        password: String,
        display_name: Option<String>,
    ) -> AuthResult<Principal> {
        self.credentials
            .register(username, password, display_name)
            .await
    }

    /// Verify credentials and open a session
    ///
    /// The session exists by the time this returns, so a cookie carrying
    /// the id can be sent right away.
    pub async fn login(&self, username: &str, password: String) -> AuthResult<SessionId> {
        let principal = match self.credentials.verify(username, password).await {
            Ok(principal) => principal,
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Login failed");
                return Err(e);
            }
        };

        let session_id = self.sessions.create(&principal).await?;

        tracing::info!(
            username = %principal.username,
            session = %session_id,
            "User logged in"
        );
        Ok(session_id)
    }

    /// End a session; never fails from the caller's point of view
    pub async fn logout(&self, session_id: &SessionId) {
        match self.sessions.destroy(session_id).await {
            Ok(_) => tracing::info!(session = %session_id, "User logged out"),
            Err(e) => tracing::error!(session = %session_id, error = %e, "Logout failed to destroy session"),
        }
    }

    pub async fn current_principal(&self, session_id: &SessionId) -> AuthResult<Option<Principal>> {
        self.sessions.resolve(session_id).await
    }

    /// Rotate the password and end every session of the user
    pub async fn change_password(
        &self,
        username: &UserName,
        current_password: String,
        new_password: String,
    ) -> AuthResult<u64> {
        self.credentials
            .rotate(username, current_password, new_password)
            .await?;
        self.sessions.destroy_all_for(username).await
    }

    /// Remove the account and end every session of the user
    pub async fn remove_account(&self, username: &UserName) -> AuthResult<bool> {
        let removed = self.credentials.remove(username).await?;
        self.sessions.destroy_all_for(username).await?;
        Ok(removed)
    }
}
