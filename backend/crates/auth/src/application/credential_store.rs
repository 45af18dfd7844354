//! Credential Store
//!
//! Owns password storage and verification. Argon2 work runs on the
//! blocking pool so request workers never stall on it.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{credential::CredentialRecord, principal::Principal};
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Credential store over any [`CredentialRepository`]
pub struct CredentialStore<C>
where
    C: CredentialRepository + Send + Sync + 'static,
{
    repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> Clone for CredentialStore<C>
where
    C: CredentialRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C> CredentialStore<C>
where
    C: CredentialRepository + Send + Sync + 'static,
{
    /// Build the store and the unknown-user decoy hash up front, so the
    /// first failed lookup costs the same as any later one.
    pub fn new(repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        platform::password::warm_up();
        Self { repo, config }
    }

    /// Register a new principal
    ///
    /// Fails with `DuplicateUser` if the name is taken. The repository
    /// insert is the authority; the existence check only skips hashing.
    pub async fn register(
        &self,
        username: &str,
        password: String,
        display_name: Option<String>,
    ) -> AuthResult<Principal> {
        let username =
            UserName::new(username).map_err(|e| AuthError::InvalidUserName(e.to_string()))?;
        let raw = RawPassword::new(password, &self.config.password_policy)?;

        if self.repo.exists(&username).await? {
            return Err(AuthError::DuplicateUser);
        }

        let password_hash = self.hash(raw).await?;

        let mut principal = Principal::new(username);
        if let Some(display_name) = display_name {
            principal = principal.with_display_name(display_name);
        }

        self.repo
            .insert(&CredentialRecord::new(principal.clone(), password_hash))
            .await?;

        tracing::info!(username = %principal.username, "Principal registered");
        Ok(principal)
    }

    /// Check a user name / password pair
    ///
    /// Unknown user, wrong password and malformed input all yield
    /// `InvalidCredentials`, and all of them pay for one Argon2 verification.
    pub async fn verify(&self, username: &str, password: String) -> AuthResult<Principal> {
        let raw = RawPassword::submitted(password);

        let record = match UserName::new(username) {
            Ok(username) => self.repo.find(&username).await?,
            Err(_) => None,
        };

        let pepper = self.config.password_pepper.clone();
        let (record, valid, raw) = tokio::task::spawn_blocking(move || {
            let valid = match &record {
                Some(record) => record.password_hash.verify(&raw, pepper.as_deref()),
                None => raw.verify_against_nothing(pepper.as_deref()),
            };
            (record, valid, raw)
        })
        .await?;

        let record = match record {
            Some(record) if valid => record,
            _ => return Err(AuthError::InvalidCredentials),
        };

        if record.password_hash.needs_rehash() {
            self.upgrade_hash(&record.principal.username, raw).await;
        }

        Ok(record.principal)
    }

    /// Replace the password after checking the current one
    pub async fn rotate(
        &self,
        username: &UserName,
        current_password: String,
        new_password: String,
    ) -> AuthResult<()> {
        let new_raw = RawPassword::new(new_password, &self.config.password_policy)?;
        self.verify(username.as_str(), current_password).await?;

        let password_hash = self.hash(new_raw).await?;
        if !self.repo.update_password(username, &password_hash).await? {
            // Removed between verify and update
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(username = %username, "Password rotated");
        Ok(())
    }

    /// Remove an account; `false` if it did not exist
    pub async fn remove(&self, username: &UserName) -> AuthResult<bool> {
        let removed = self.repo.delete(username).await?;
        if removed {
            tracing::info!(username = %username, "Principal removed");
        }
        Ok(removed)
    }

    pub async fn find(&self, username: &UserName) -> AuthResult<Option<Principal>> {
        Ok(self.repo.find(username).await?.map(|record| record.principal))
    }

    async fn hash(&self, raw: RawPassword) -> AuthResult<UserPassword> {
        let pepper = self.config.password_pepper.clone();
        tokio::task::spawn_blocking(move || UserPassword::from_raw(&raw, pepper.as_deref()))
            .await?
    }

    /// Best effort; a failed upgrade keeps the old, still valid hash
    async fn upgrade_hash(&self, username: &UserName, raw: RawPassword) {
        let result = match self.hash(raw).await {
            Ok(password_hash) => self.repo.update_password(username, &password_hash).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => tracing::debug!(username = %username, "Password hash upgraded"),
            Err(e) => tracing::warn!(username = %username, error = %e, "Password hash upgrade failed"),
        }
    }
}
