//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Google OAuth provider settings
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for HS256 access-token signing
    pub jwt_secret: Vec<u8>,
    /// Access token TTL (30 minutes). Must stay strictly shorter than
    /// `refresh_token_ttl`.
    pub access_token_ttl: Duration,
    /// Refresh token TTL (7 days)
    pub refresh_token_ttl: Duration,
    /// Email verification token TTL (24 hours)
    pub verification_token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Google OAuth settings; None disables the OAuth endpoints
    pub google: Option<GoogleOAuthConfig>,
    /// Frontend base URL for verification links and OAuth redirects
    pub frontend_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: vec![0u8; 32],
            access_token_ttl: Duration::from_secs(30 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            verification_token_ttl: Duration::from_secs(24 * 3600),
            password_pepper: None,
            google: None,
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            jwt_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Refresh TTL as a chrono duration for expiry arithmetic
    pub fn refresh_token_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.refresh_token_ttl)
            .unwrap_or_else(|_| chrono::Duration::days(7))
    }

    /// Verification TTL as a chrono duration
    pub fn verification_token_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.verification_token_ttl)
            .unwrap_or_else(|_| chrono::Duration::hours(24))
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// URL of the email-verification landing page for a token
    pub fn verification_url(&self, token: &str) -> String {
        format!("{}/verify-email?token={}", self.frontend_url, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl, Duration::from_secs(1800));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(604800));
        assert_eq!(config.verification_token_ttl, Duration::from_secs(86400));
        // The access token must always outlive no refresh token
        assert!(config.access_token_ttl < config.refresh_token_ttl);
    }

    #[test]
    fn test_with_random_secret() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_ne!(a.jwt_secret, b.jwt_secret);
        assert!(a.jwt_secret.iter().any(|&byte| byte != 0));
    }

    #[test]
    fn test_verification_url() {
        let config = AuthConfig::default();
        assert_eq!(
            config.verification_url("abc"),
            "http://localhost:3000/verify-email?token=abc"
        );
    }
}
