//! Credential Record Entity
//!
//! One-to-one with a [`Principal`]. Separated from the principal so the
//! hash never travels with the identity handed to handlers.

use chrono::{DateTime, Utc};

use crate::domain::entity::principal::Principal;
use crate::domain::value_object::user_password::UserPassword;

#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub principal: Principal,
    /// Argon2id PHC string (algorithm, parameters, salt, hash)
    pub password_hash: UserPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    pub fn new(principal: Principal, password_hash: UserPassword) -> Self {
        let now = Utc::now();
        Self {
            principal,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the stored hash (credential rotation)
    pub fn rotate(&mut self, password_hash: UserPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}
