//! Application Configuration
//!
//! Configuration for the gateway's use cases and cookies.

use std::time::Duration;

use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// HMAC key signing the session cookie (32 bytes)
    pub session_secret: [u8; 32],
    /// Idle lifetime of a server-side session
    pub session_ttl: Duration,
    /// Remember-me cookie name
    pub remember_cookie_name: String,
    /// Lifetime of a remember token
    pub remember_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Default destination after login and logout
    pub home_path: String,
    /// Where the login form is served
    pub login_path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "_session_id".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(12 * 3600), // 12 hours
            remember_cookie_name: "auth_token".to_string(),
            remember_ttl: Duration::from_secs(14 * 24 * 3600), // 2 weeks
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            home_path: "/".to_string(),
            login_path: "/login".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&platform::crypto::random_bytes(32));
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

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or(chrono::Duration::hours(12))
    }

    pub fn remember_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.remember_ttl).unwrap_or(chrono::Duration::weeks(2))
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Browser-session cookie; server-side expiry is authoritative
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }

    pub fn remember_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.remember_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.remember_cookie_name, "auth_token");
        assert_eq!(config.remember_ttl(), chrono::Duration::days(14));
        assert_eq!(config.session_ttl(), chrono::Duration::hours(12));
        assert_eq!(config.home_path, "/");
        assert!(config.cookie_secure);
    }

    #[test]
    fn test_development_secret_is_random() {
        let a = GatewayConfig::development();
        let b = GatewayConfig::development();
        assert!(!a.cookie_secure);
        assert_ne!(a.session_secret, b.session_secret);
        assert_ne!(a.session_secret, [0u8; 32]);
    }

    #[test]
    fn test_cookie_configs_follow_settings() {
        let config = GatewayConfig::development();
        let remember = config.remember_cookie();
        assert_eq!(remember.name, "auth_token");
        assert!(!remember.secure);
        assert!(remember.http_only);

        let session = config.session_cookie();
        assert_eq!(session.name, "_session_id");
        assert_eq!(session.max_age_secs, None);
    }
}
