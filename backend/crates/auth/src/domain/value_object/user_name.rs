//! User Name Value Object
//!
//! The user name is the unique key of a principal and the identifier typed
//! at login. It is compared exactly: `Paul` and `paul` are two accounts.
//!
//! ## Invariants
//! - NFC normalized (so visually identical input maps to one key)
//! - 1 to [`USER_NAME_MAX_LENGTH`] characters
//! - No whitespace and no control characters anywhere

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 64;

/// User name validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    Empty,
    TooLong { length: usize, max: usize },
    ContainsWhitespace,
    InvalidCharacter { position: usize },
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "User name cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "User name is too long ({length} chars, maximum {max})")
            }
            Self::ContainsWhitespace => write!(f, "User name cannot contain whitespace"),
            Self::InvalidCharacter { position } => {
                write!(f, "User name contains a control character at position {position}")
            }
        }
    }
}

impl std::error::Error for UserNameError {}

/// Validated, case-preserving user name
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let normalized: String = input.as_ref().nfc().collect();
        Self::validate(&normalized)?;
        Ok(Self(normalized))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    fn validate(name: &str) -> Result<(), UserNameError> {
        if name.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = name.chars().count();
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        if name.chars().any(char::is_whitespace) {
            return Err(UserNameError::ContainsWhitespace);
        }

        if let Some(position) = name.chars().position(char::is_control) {
            return Err(UserNameError::InvalidCharacter { position });
        }

        Ok(())
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserName").field(&self.0).finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserName {
    type Error = UserNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["paul", "Paul", "p", "paul.smith+tag@example.org", "名前"] {
            assert!(UserName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_case_is_preserved_and_significant() {
        let upper = UserName::new("Paul").unwrap();
        let lower = UserName::new("paul").unwrap();
        assert_eq!(upper.as_str(), "Paul");
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_empty_fails() {
        assert_eq!(UserName::new(""), Err(UserNameError::Empty));
    }

    #[test]
    fn test_whitespace_fails() {
        assert_eq!(UserName::new("pa ul"), Err(UserNameError::ContainsWhitespace));
        assert_eq!(UserName::new(" paul"), Err(UserNameError::ContainsWhitespace));
        assert_eq!(UserName::new("paul\t"), Err(UserNameError::ContainsWhitespace));
    }

    #[test]
    fn test_control_character_fails() {
        assert_eq!(
            UserName::new("pa\u{0000}ul"),
            Err(UserNameError::InvalidCharacter { position: 2 })
        );
    }

    #[test]
    fn test_length_limit() {
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
        assert!(matches!(
            UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)),
            Err(UserNameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_nfc_normalization() {
        // "é" precomposed vs. "e" + combining acute
        let composed = UserName::new("caf\u{00e9}").unwrap();
        let decomposed = UserName::new("cafe\u{0301}").unwrap();
        assert_eq!(composed, decomposed);
    }

    #[test]
    fn test_serde_validates() {
        let name: UserName = serde_json::from_str("\"paul\"").unwrap();
        assert_eq!(name.as_str(), "paul");
        assert!(serde_json::from_str::<UserName>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"paul\"");
    }
}
