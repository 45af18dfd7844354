//! Cookie Management Infrastructure
//!
//! Building `Set-Cookie` values and reading cookies from request headers.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::http::header::InvalidHeaderValue;

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }

    /// Parse a case-insensitive policy name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }
}

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<u64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);
        self.push_attributes(&mut cookie);

        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// Build Set-Cookie header that makes the browser drop the cookie
    ///
    /// Attributes match the issuing cookie; browsers ignore a removal whose
    /// Path or Secure flag differs from the original.
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=", self.name);
        self.push_attributes(&mut cookie);
        cookie.push_str("; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
        cookie
    }

    fn push_attributes(&self, cookie: &mut String) {
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));
    }
}

/// Extract a cookie value from headers
///
/// Looks through every `Cookie` header; the first match wins.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name {
                Some(value.trim_matches('"').to_string())
            } else {
                None
            }
        })
}

/// Create a Set-Cookie header value
pub fn set_cookie_header(config: &CookieConfig, value: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&config.build_set_cookie(value))
}

/// Create a Set-Cookie header value that deletes the cookie
pub fn delete_cookie_header(config: &CookieConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&config.build_delete_cookie())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CookieConfig {
        CookieConfig {
            name: "sid".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/app".to_string(),
            max_age_secs: Some(3600),
        }
    }

    #[test]
    fn test_cookie_config_build() {
        let cookie = config().build_set_cookie("value123");
        assert!(cookie.starts_with("sid=value123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/app"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_insecure_cookie_has_no_secure_flag() {
        let cookie = CookieConfig {
            secure: false,
            ..config()
        }
        .build_set_cookie("v");
        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn test_delete_cookie_matches_scope() {
        let cookie = config().build_delete_cookie();
        assert!(cookie.starts_with("sid=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/app"));
        assert!(cookie.contains("Secure"));
        assert!(!cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; session=abc123; other=xyz"),
        );

        assert_eq!(
            extract_cookie(&headers, "session"),
            Some("abc123".to_string())
        );
        assert_eq!(extract_cookie(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("foo=bar"));
        headers.append(header::COOKIE, HeaderValue::from_static("sid=\"quoted\""));

        assert_eq!(extract_cookie(&headers, "sid"), Some("quoted".to_string()));
    }

    #[test]
    fn test_same_site_parse() {
        assert_eq!(SameSite::parse("Strict"), Some(SameSite::Strict));
        assert_eq!(SameSite::parse(" lax "), Some(SameSite::Lax));
        assert_eq!(SameSite::parse("NONE"), Some(SameSite::None));
        assert_eq!(SameSite::parse("sometimes"), None);
    }

    #[test]
    fn test_header_values_build() {
        assert!(set_cookie_header(&config(), "abc").is_ok());
        assert!(delete_cookie_header(&config()).is_ok());
    }
}
