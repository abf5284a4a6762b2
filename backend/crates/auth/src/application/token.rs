//! Access Token Signer
//!
//! Mints and verifies short-lived bearer credentials without storage.
//! Purely functional: no I/O, no shared mutable state.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Access token claims: subject, issued-at, expiry. Nothing else - the
/// token resolves to a full identity on every request via the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Stateless HS256 signer for access tokens
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.access_token_ttl)
    }

    /// Issue a signed access token for a user
    pub fn issue(&self, user_id: &UserId) -> AuthResult<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock before Unix epoch".to_string()))?
            .as_secs();

        let claims = AccessClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign access token: {}", e)))
    }

    /// Verify a token and return the subject.
    ///
    /// Any failure - bad signature, malformed payload, expired,
    /// non-uuid subject - collapses into `Unauthenticated`.
    pub fn verify(&self, token: &str) -> AuthResult<UserId> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data =
            jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &validation)
                .map_err(|_| AuthError::Unauthenticated)?;

        let uuid = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|_| AuthError::Unauthenticated)?;

        Ok(UserId::from_uuid(uuid))
    }
}
