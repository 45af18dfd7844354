//! Password Hashing and Verification
//!
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of clear text and peppered buffers
//! - Constant-time comparison (inside `argon2`)
//! - Dummy verification so that "no such user" costs as much as a real check
//!
//! Policy checks (length, patterns) apply when a password is *chosen*.
//! Passwords submitted at login are only normalized, never policy-checked,
//! so a policy change never locks existing users out.

use std::fmt;
use std::sync::OnceLock;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::random_token;

// ============================================================================
// Policy
// ============================================================================

/// Default minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Default maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Rules applied when a new password is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    /// Reject keyboard walks, sequences and well-known passwords
    pub reject_common: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            max_length: MAX_PASSWORD_LENGTH,
            reject_common: true,
        }
    }
}

impl PasswordPolicy {
    /// Length limits only
    pub fn lenient(min_length: usize) -> Self {
        Self {
            min_length: min_length.max(1),
            reject_common: false,
            ..Self::default()
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, and `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validate a newly chosen password against `policy`
    ///
    /// Unicode is normalized using NFKC before validation.
    pub fn new(raw: String, policy: &PasswordPolicy) -> Result<Self, PasswordPolicyError> {
        let password = Self::from_input(raw);
        let normalized = password.0.as_str();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Count Unicode code points (not bytes)
        let char_count = normalized.chars().count();

        if char_count < policy.min_length {
            return Err(PasswordPolicyError::TooShort {
                min: policy.min_length,
                actual: char_count,
            });
        }

        if char_count > policy.max_length {
            return Err(PasswordPolicyError::TooLong {
                max: policy.max_length,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if policy.reject_common && is_common_pattern(normalized) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(password)
    }

    /// Wrap a password submitted for verification (normalization only)
    pub fn from_input(raw: String) -> Self {
        let raw = Zeroizing::new(raw);
        Self(raw.nfkc().collect())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash the password using Argon2id with a fresh random salt
    ///
    /// ## Returns
    /// PHC-formatted hash string wrapped in `HashedPassword`
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let password_bytes = self.peppered(pepper);

        // 128-bit salt
        let salt = SaltString::generate(OsRng);

        // Argon2id, m=19456 (19 MiB), t=2, p=1
        let hash = Argon2::default()
            .hash_password(&password_bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string carries algorithm, version, parameters, salt and hash,
/// so a stored value is self-describing.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let password_bytes = password.peppered(pepper);

        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok()
    }

    /// True if the stored hash is not Argon2id with current parameters
    pub fn needs_rehash(&self) -> bool {
        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return true,
        };

        parsed_hash.algorithm != argon2::Algorithm::Argon2id.ident()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

static DUMMY_HASH: OnceLock<Option<HashedPassword>> = OnceLock::new();

fn dummy_hash() -> Option<&'static HashedPassword> {
    DUMMY_HASH
        .get_or_init(|| {
            ClearTextPassword::from_input(random_token(24))
                .hash(None)
                .ok()
        })
        .as_ref()
}

/// Build the throwaway hash used by [`verify_dummy`] ahead of time.
///
/// Blocks for one Argon2 hash on the first call and is free afterwards.
/// Without it the first unknown-user login pays for a hash and a verify.
pub fn warm_up() {
    let _ = dummy_hash();
}

/// Run a full Argon2 verification against a throwaway hash.
///
/// Used when the account does not exist, so that the response time does
/// not reveal whether the user name is registered. Always returns `false`.
pub fn verify_dummy(password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
    match dummy_hash() {
        Some(hash) => {
            let _ = hash.verify(password, pepper);
        }
        None => hash_for_timing(password, pepper),
    }

    false
}

// The dummy hash could not be built; hashing the input costs the same
fn hash_for_timing(password: &ClearTextPassword, pepper: Option<&[u8]>) {
    let _ = password.hash(pepper);
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Check for common weak patterns
fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    // All same character (e.g., "aaaaaaaa")
    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if lower.chars().count() >= 3 && chars.all(|c| c == first) {
            return true;
        }
    }

    if is_sequential_numbers(&lower) {
        return true;
    }

    const KEYBOARD_PATTERNS: &[&str] = &[
        "qwerty",
        "asdfgh",
        "zxcvbn",
        "qazwsx",
        "1qaz2wsx",
    ];

    if KEYBOARD_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
        return true;
    }

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "abcdefgh",
        "letmein",
        "welcome",
        "admin123",
        "iloveyou",
        "sunshine",
        "princess",
        "football",
        "monkey",
        "shadow",
        "master",
        "dragon",
        "baseball",
        "trustno1",
    ];

    COMMON_PASSWORDS.contains(&lower.as_str())
}

/// Check if string is sequential numbers
fn is_sequential_numbers(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 4 || digits.len() != s.chars().count() {
        return false;
    }

    let is_ascending = digits
        .windows(2)
        .all(|w| w[1] == w[0] + 1 || (w[0] == 9 && w[1] == 0));

    let is_descending = digits
        .windows(2)
        .all(|w| w[0] == w[1] + 1 || (w[0] == 0 && w[1] == 9));

    is_ascending || is_descending
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::default()
    }

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("short".to_string(), &policy());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "ab".repeat(MAX_PASSWORD_LENGTH);
        let result = ClearTextPassword::new(long_password, &policy());
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string(), &policy());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_control_character() {
        let result = ClearTextPassword::new("abc\u{0007}defgh".to_string(), &policy());
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_password_common_pattern() {
        for weak in ["password123", "qwertyuiop", "12345678", "zzzzzzzz"] {
            let result = ClearTextPassword::new(weak.to_string(), &policy());
            assert!(
                matches!(result, Err(PasswordPolicyError::CommonPattern)),
                "{weak} should be rejected"
            );
        }
    }

    #[test]
    fn test_lenient_policy_allows_short_passwords() {
        let lenient = PasswordPolicy::lenient(3);
        assert!(ClearTextPassword::new("pw1".to_string(), &lenient).is_ok());
        assert!(matches!(
            ClearTextPassword::new("pw".to_string(), &lenient),
            Err(PasswordPolicyError::TooShort { min: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_unicode_password_is_normalized() {
        // Fullwidth letters normalize to ASCII under NFKC
        let fullwidth = ClearTextPassword::from_input("ｐａｓｓ".to_string());
        let ascii = ClearTextPassword::from_input("pass".to_string());
        let hashed = ascii.hash(None).unwrap();
        assert!(hashed.verify(&fullwidth, None));
    }

    #[test]
    fn test_hash_and_verify() {
        let password = ClearTextPassword::from_input("TestPassword123!".to_string());
        let hashed = password.hash(None).unwrap();

        assert!(hashed.verify(&password, None));

        let wrong = ClearTextPassword::from_input("WrongPassword123!".to_string());
        assert!(!hashed.verify(&wrong, None));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let password = ClearTextPassword::from_input("TestPassword123!".to_string());
        let a = password.hash(None).unwrap();
        let b = password.hash(None).unwrap();
        assert_ne!(a.as_phc_string(), b.as_phc_string());
    }

    #[test]
    fn test_hash_with_pepper() {
        let password = ClearTextPassword::from_input("TestPassword123!".to_string());
        let pepper = b"my_secret_pepper";
        let hashed = password.hash(Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)));
        assert!(!hashed.verify(&password, None));
        assert!(!hashed.verify(&password, Some(b"wrong_pepper")));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let password = ClearTextPassword::from_input("TestPassword123!".to_string());
        let hashed = password.hash(None).unwrap();

        let phc = hashed.as_phc_string().to_string();
        assert!(phc.starts_with("$argon2id$"));
        assert!(!phc.contains("TestPassword123!"));

        let restored = HashedPassword::from_phc_string(phc).unwrap();
        assert!(restored.verify(&password, None));
        assert!(!restored.needs_rehash());
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_verify_dummy_never_succeeds() {
        let password = ClearTextPassword::from_input("anything".to_string());
        assert!(!verify_dummy(&password, None));
        assert!(!verify_dummy(&password, Some(b"pepper")));
    }

    #[test]
    fn test_warm_up_builds_dummy_hash() {
        warm_up();
        let first = dummy_hash().map(HashedPassword::as_phc_string);
        assert!(first.is_some_and(|h| h.starts_with("$argon2id$")));

        warm_up();
        assert_eq!(dummy_hash().map(HashedPassword::as_phc_string), first);
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::from_input("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));

        let hashed = password.hash(None).unwrap();
        assert!(!format!("{:?}", hashed).contains("argon2"));
    }
}
