//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entity::{credential::CredentialRecord, principal::Principal};
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{user_name::UserName, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed credential repository
#[derive(Clone)]
pub struct PgCredentialRepository {
    pool: PgPool,
}

impl PgCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgCredentialRepository {
    async fn insert(&self, record: &CredentialRecord) -> AuthResult<()> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO credentials (
                username,
                display_name,
                password_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(record.principal.username.as_str())
        .bind(record.principal.display_name.as_deref())
        .bind(record.password_hash.as_phc_string())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(AuthError::DuplicateUser);
        }

        Ok(())
    }

    async fn find(&self, username: &UserName) -> AuthResult<Option<CredentialRecord>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                username,
                display_name,
                password_hash,
                created_at,
                updated_at
            FROM credentials
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_record()).transpose()
    }

    async fn exists(&self, username: &UserName) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM credentials WHERE username = $1)")
                .bind(username.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update_password(
        &self,
        username: &UserName,
        password_hash: &UserPassword,
    ) -> AuthResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE credentials SET
                password_hash = $2,
                updated_at = now()
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash.as_phc_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete(&self, username: &UserName) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM credentials WHERE username = $1")
            .bind(username.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct CredentialRow {
    username: String,
    display_name: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_record(self) -> AuthResult<CredentialRecord> {
        let username = UserName::new(&self.username)
            .map_err(|e| AuthError::Internal(format!("Invalid username in store: {}", e)))?;

        let mut principal = Principal::new(username);
        if let Some(display_name) = self.display_name {
            principal = principal.with_display_name(display_name);
        }

        Ok(CredentialRecord {
            principal,
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
