//! Session Entity
//!
//! Server-side record binding a [`SessionId`] to a principal by user name.
//! The record refers to the principal; it does not own it.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{session_id::SessionId, user_name::UserName};

/// When a session stops being valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    /// Maximum time between two requests
    pub idle_timeout: Duration,
    /// Hard cap from creation, regardless of activity
    pub absolute_lifetime: Option<Duration>,
    /// Refresh `last_access_at` on every successful lookup
    pub sliding: bool,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::minutes(30),
            absolute_lifetime: Some(Duration::hours(12)),
            sliding: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: SessionId,
    pub username: UserName,
    pub created_at: DateTime<Utc>,
    pub last_access_at: DateTime<Utc>,
    pub idle_timeout: Duration,
    pub absolute_expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(username: UserName, policy: &ExpiryPolicy, now: DateTime<Utc>) -> Self {
        Self {
            session_id: SessionId::generate(),
            username,
            created_at: now,
            last_access_at: now,
            idle_timeout: policy.idle_timeout,
            absolute_expires_at: policy
                .absolute_lifetime
                .and_then(|lifetime| now.checked_add_signed(lifetime)),
        }
    }

    /// Earliest instant at which the session is no longer valid
    pub fn expires_at(&self) -> DateTime<Utc> {
        let idle_deadline = self
            .last_access_at
            .checked_add_signed(self.idle_timeout)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        match self.absolute_expires_at {
            Some(absolute) => idle_deadline.min(absolute),
            None => idle_deadline,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_access_at {
            self.last_access_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserName {
        UserName::new("paul").unwrap()
    }

    fn policy(idle_secs: i64, absolute_secs: Option<i64>) -> ExpiryPolicy {
        ExpiryPolicy {
            idle_timeout: Duration::seconds(idle_secs),
            absolute_lifetime: absolute_secs.map(Duration::seconds),
            sliding: true,
        }
    }

    #[test]
    fn test_fresh_session_is_valid() {
        let now = Utc::now();
        let session = Session::new(user(), &policy(60, None), now);
        assert!(!session.is_expired_at(now));
        assert_eq!(session.created_at, session.last_access_at);
    }

    #[test]
    fn test_idle_timeout() {
        let now = Utc::now();
        let session = Session::new(user(), &policy(60, None), now);
        assert!(!session.is_expired_at(now + Duration::seconds(59)));
        assert!(session.is_expired_at(now + Duration::seconds(60)));
    }

    #[test]
    fn test_touch_slides_idle_deadline() {
        let now = Utc::now();
        let mut session = Session::new(user(), &policy(60, None), now);
        session.touch(now + Duration::seconds(50));
        assert!(!session.is_expired_at(now + Duration::seconds(100)));
        assert!(session.is_expired_at(now + Duration::seconds(110)));
    }

    #[test]
    fn test_touch_never_moves_backwards() {
        let now = Utc::now();
        let mut session = Session::new(user(), &policy(60, None), now);
        session.touch(now - Duration::seconds(30));
        assert_eq!(session.last_access_at, now);
    }

    #[test]
    fn test_absolute_lifetime_caps_sliding() {
        let now = Utc::now();
        let mut session = Session::new(user(), &policy(60, Some(90)), now);
        session.touch(now + Duration::seconds(50));
        assert_eq!(session.expires_at(), now + Duration::seconds(90));
        assert!(session.is_expired_at(now + Duration::seconds(90)));
    }
}
