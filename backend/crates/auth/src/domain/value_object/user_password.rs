//! User Password Value Object
//!
//! Domain wrappers over `platform::password`.
//!
//! - [`RawPassword`]: clear text from a form, zeroized on drop
//! - [`UserPassword`]: Argon2id PHC hash, the only form that is stored

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordPolicy, verify_dummy,
};
use std::fmt;

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// A password being chosen (registration, rotation); policy applies
    pub fn new(raw: String, policy: &PasswordPolicy) -> AuthResult<Self> {
        ClearTextPassword::new(raw, policy)
            .map(Self)
            .map_err(|e| AuthError::PasswordPolicy(e.to_string()))
    }

    /// A password submitted for verification; never rejected by policy
    pub fn submitted(raw: String) -> Self {
        Self(ClearTextPassword::from_input(raw))
    }

    /// Burn the same Argon2 cost as a real verification; always `false`
    pub fn verify_against_nothing(&self, pepper: Option<&[u8]>) -> bool {
        verify_dummy(&self.0, pepper)
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a validated raw password
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        raw.inner()
            .hash(pepper)
            .map(Self)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Load a stored PHC string
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|_| AuthError::Internal("Invalid password hash in store".to_string()))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }

    pub fn needs_rehash(&self) -> bool {
        self.0.needs_rehash()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_applies_to_new_passwords_only() {
        let policy = PasswordPolicy::default();
        assert!(matches!(
            RawPassword::new("pw1".to_string(), &policy),
            Err(AuthError::PasswordPolicy(_))
        ));

        // The same string is still accepted as a login attempt
        let submitted = RawPassword::submitted("pw1".to_string());
        assert!(!submitted.verify_against_nothing(None));
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("Correct-Horse-7".to_string(), &PasswordPolicy::default())
            .unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();

        assert!(hashed.verify(&RawPassword::submitted("Correct-Horse-7".to_string()), None));
        assert!(!hashed.verify(&RawPassword::submitted("correct-horse-7".to_string()), None));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let raw = RawPassword::submitted("Correct-Horse-7".to_string());
        let hashed = UserPassword::from_raw(&raw, Some(b"pepper")).unwrap();

        let restored = UserPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&raw, Some(b"pepper")));
        assert!(matches!(
            UserPassword::from_phc_string("plaintext"),
            Err(AuthError::Internal(_))
        ));
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::submitted("SecretPassword123!".to_string());
        assert!(!format!("{:?}", raw).contains("Secret"));

        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(format!("{:?}", hashed).contains("[HASH]"));
    }
}
