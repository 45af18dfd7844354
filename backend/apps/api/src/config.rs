//! Server configuration loaded from the environment

use anyhow::{Context, bail};
use auth::config::{AuthConfig, GuardPolicy, PasswordPolicy, SameSite};
use base64::Engine;
use base64::engine::general_purpose;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// PostgreSQL for credentials; in-memory when unset
    pub database_url: Option<String>,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env_parsed("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 31113)))?;
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let mut auth = match env::var("SESSION_SECRET") {
            Ok(secret_b64) => AuthConfig {
                session_secret: decode_secret(&secret_b64)?,
                ..AuthConfig::default()
            },
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("SESSION_SECRET not set, using a random secret");
                AuthConfig::development()
            }
            Err(_) => bail!("SESSION_SECRET must be set in production"),
        };

        auth.session_idle_timeout = Duration::from_secs(env_parsed(
            "SESSION_IDLE_TIMEOUT_SECS",
            auth.session_idle_timeout.as_secs(),
        )?);
        auth.session_absolute_lifetime = match env_parsed(
            "SESSION_ABSOLUTE_LIFETIME_SECS",
            auth.session_absolute_lifetime.map_or(0, |d| d.as_secs()),
        )? {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        auth.session_sweep_interval = Duration::from_secs(env_parsed(
            "SESSION_SWEEP_INTERVAL_SECS",
            auth.session_sweep_interval.as_secs(),
        )?);
        auth.cookie_secure = env_parsed("COOKIE_SECURE", auth.cookie_secure)?;
        if let Ok(value) = env::var("COOKIE_SAME_SITE") {
            auth.cookie_same_site = parse_same_site(&value)?;
        }
        auth.password_pepper = env::var("PASSWORD_PEPPER")
            .ok()
            .filter(|pepper| !pepper.is_empty())
            .map(String::into_bytes);
        auth.password_policy = PasswordPolicy {
            min_length: env_parsed("PASSWORD_MIN_LENGTH", auth.password_policy.min_length)?,
            ..auth.password_policy
        };
        if env_parsed("GUARD_REDIRECT_TO_LOGIN", false)? {
            auth.guard_policy = GuardPolicy::RedirectToLogin;
        }

        Ok(Self {
            bind_addr,
            database_url,
            auth,
        })
    }
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .context("SESSION_SECRET is not valid base64")?;

    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| anyhow::anyhow!("SESSION_SECRET must be 32 bytes, got {}", bytes.len()))
}

fn parse_same_site(value: &str) -> anyhow::Result<SameSite> {
    SameSite::parse(value)
        .with_context(|| format!("COOKIE_SAME_SITE must be Strict, Lax or None, got {value:?}"))
}

fn env_parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_secret() {
        let encoded = general_purpose::STANDARD.encode([7u8; 32]);
        assert_eq!(decode_secret(&encoded).unwrap(), [7u8; 32]);

        let short = general_purpose::STANDARD.encode([7u8; 16]);
        assert!(decode_secret(&short).is_err());
        assert!(decode_secret("not base64!").is_err());
    }

    #[test]
    fn test_parse_same_site() {
        assert_eq!(parse_same_site("strict").unwrap(), SameSite::Strict);
        assert_eq!(parse_same_site(" None ").unwrap(), SameSite::None);
        assert!(parse_same_site("sometimes").is_err());
    }
}
