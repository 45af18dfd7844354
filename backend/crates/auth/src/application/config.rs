//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::{TokenSigner, random_bytes};

use crate::domain::entity::session::ExpiryPolicy;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;
/// Re-export PasswordPolicy from platform
pub use platform::password::PasswordPolicy;

/// What a protected route answers to an anonymous request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardPolicy {
    /// 401 with `X-Auth-Required: true`
    #[default]
    Unauthorized,
    /// 303 to the login page
    RedirectToLogin,
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session ends after this long without a request (30 minutes)
    pub session_idle_timeout: Duration,
    /// Hard cap from login, regardless of activity (12 hours)
    pub session_absolute_lifetime: Option<Duration>,
    /// Each resolved request pushes the idle deadline forward
    pub sliding_expiry: bool,
    /// How often the sweeper purges expired sessions
    pub session_sweep_interval: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Cookie Path attribute
    pub cookie_path: String,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Rules for newly chosen passwords
    pub password_policy: PasswordPolicy,
    /// Answer to anonymous requests on protected routes
    pub guard_policy: GuardPolicy,
    /// Login page used by redirects
    pub login_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "sid".to_string(),
            session_secret: [0u8; 32],
            session_idle_timeout: Duration::from_secs(30 * 60), // 30 minutes
            session_absolute_lifetime: Some(Duration::from_secs(12 * 3600)), // 12 hours
            sliding_expiry: true,
            session_sweep_interval: Duration::from_secs(60),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            cookie_path: "/".to_string(),
            password_pepper: None,
            password_policy: PasswordPolicy::default(),
            guard_policy: GuardPolicy::default(),
            login_path: "/login".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&random_bytes(32));
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Signer for session cookie values
    pub fn token_signer(&self) -> TokenSigner {
        TokenSigner::new(self.session_secret)
    }

    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy {
            idle_timeout: to_chrono(self.session_idle_timeout),
            absolute_lifetime: self.session_absolute_lifetime.map(to_chrono),
            sliding: self.sliding_expiry,
        }
    }

    /// Session cookie attributes.
    ///
    /// The cookie is only issued at login, so under sliding expiry its
    /// Max-Age must cover the longest a session can live: the absolute
    /// lifetime, or the browser session when there is none.
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: self.cookie_path.clone(),
            max_age_secs: self.cookie_max_age().map(|d| d.as_secs()),
        }
    }

    fn cookie_max_age(&self) -> Option<Duration> {
        if self.sliding_expiry {
            return self.session_absolute_lifetime;
        }
        Some(match self.session_absolute_lifetime {
            Some(absolute) => absolute.min(self.session_idle_timeout),
            None => self.session_idle_timeout,
        })
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_cookie_name", &self.session_cookie_name)
            .field("session_secret", &"[REDACTED]")
            .field("session_idle_timeout", &self.session_idle_timeout)
            .field("session_absolute_lifetime", &self.session_absolute_lifetime)
            .field("sliding_expiry", &self.sliding_expiry)
            .field("session_sweep_interval", &self.session_sweep_interval)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("cookie_path", &self.cookie_path)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("password_policy", &self.password_policy)
            .field("guard_policy", &self.guard_policy)
            .field("login_path", &self.login_path)
            .finish()
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_config() {
        let config = AuthConfig::development();
        assert!(!config.cookie_secure);
        assert_ne!(config.session_secret, [0u8; 32]);
        assert_ne!(
            AuthConfig::with_random_secret().session_secret,
            config.session_secret
        );
    }

    #[test]
    fn test_sliding_cookie_outlives_idle_timeout() {
        let config = AuthConfig {
            session_idle_timeout: Duration::from_secs(900),
            ..AuthConfig::default()
        };
        let cookie = config.cookie_config();
        assert_eq!(cookie.name, "sid");
        assert_eq!(cookie.max_age_secs, Some(12 * 3600));
        assert!(cookie.http_only);
        assert!(cookie.secure);

        let unbounded = AuthConfig {
            session_absolute_lifetime: None,
            ..config
        };
        assert_eq!(unbounded.cookie_config().max_age_secs, None);
    }

    #[test]
    fn test_fixed_expiry_cookie_uses_shortest_limit() {
        let config = AuthConfig {
            session_idle_timeout: Duration::from_secs(900),
            sliding_expiry: false,
            ..AuthConfig::default()
        };
        assert_eq!(config.cookie_config().max_age_secs, Some(900));

        let capped = AuthConfig {
            session_absolute_lifetime: Some(Duration::from_secs(60)),
            ..config
        };
        assert_eq!(capped.cookie_config().max_age_secs, Some(60));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AuthConfig {
            session_secret: [0xAB; 32],
            password_pepper: Some(b"pepper-value".to_vec()),
            ..AuthConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("171"));
        assert!(!debug.contains("pepper-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_expiry_policy_conversion() {
        let config = AuthConfig {
            session_idle_timeout: Duration::from_secs(90),
            session_absolute_lifetime: None,
            sliding_expiry: false,
            ..AuthConfig::default()
        };
        let policy = config.expiry_policy();
        assert_eq!(policy.idle_timeout, chrono::Duration::seconds(90));
        assert_eq!(policy.absolute_lifetime, None);
        assert!(!policy.sliding);
    }
}
