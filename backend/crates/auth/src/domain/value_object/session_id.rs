//! Session ID Value Object
//!
//! Opaque, unguessable session identifier. 256 bits of OS entropy,
//! URL-safe base64 without padding. It never encodes the user name.

use std::fmt;

use platform::crypto::random_token;

/// Entropy per session id in bytes
pub const SESSION_ID_BYTES: usize = 32;

/// Encoded length of a session id (unpadded base64 of 32 bytes)
pub const SESSION_ID_LEN: usize = 43;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random session id
    pub fn generate() -> Self {
        Self(random_token(SESSION_ID_BYTES))
    }

    /// Accept a session id read back from a client
    ///
    /// Only the shape is checked; existence is the store's concern.
    pub fn parse(s: &str) -> Option<Self> {
        let well_formed = s.len() == SESSION_ID_LEN
            && s
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

        well_formed.then(|| Self(s.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix that is safe to put in logs
    pub fn log_id(&self) -> &str {
        &self.0[..8]
    }
}

// Session ids are bearer secrets; Debug/Display only show the log prefix
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({}…)", self.log_id())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}…", self.log_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_shape() {
        let id = SessionId::generate();
        assert_eq!(id.as_str().len(), SESSION_ID_LEN);
        assert_eq!(SessionId::parse(id.as_str()), Some(id));
    }

    #[test]
    fn test_generate_is_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| SessionId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(SessionId::parse("").is_none());
        assert!(SessionId::parse("short").is_none());
        assert!(SessionId::parse(&"a".repeat(SESSION_ID_LEN + 1)).is_none());
        assert!(SessionId::parse(&format!("{}=", "a".repeat(SESSION_ID_LEN - 1))).is_none());
        assert!(SessionId::parse(&"a".repeat(SESSION_ID_LEN)).is_some());
    }

    #[test]
    fn test_debug_hides_full_id() {
        let id = SessionId::generate();
        let debug = format!("{:?}", id);
        assert!(!debug.contains(id.as_str()));
        assert!(debug.contains(id.log_id()));
    }
}
