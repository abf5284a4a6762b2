//! Refresh Token Entity
//!
//! One row in the refresh-token ledger. A token is either live or
//! terminal; a revoked token with a `replaced_by_token` pointer was
//! rotated forward, and presenting it again is the reuse signal.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::user_id::UserId;
use platform::crypto::random_urlsafe_token;

/// Entropy of the opaque token string: 48 bytes = 384 bits
const TOKEN_ENTROPY_BYTES: usize = 48;

/// Refresh token ledger record
#[derive(Debug, Clone)]
pub struct RefreshToken {
    /// Opaque random token string (unique). Carries no claims; it is
    /// meaningless outside a ledger lookup.
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    /// Forward pointer set only on rotation, never on logout
    pub replaced_by_token: Option<String>,
    pub device_id: Option<String>,
}

impl RefreshToken {
    /// Mint a new live token for a user
    pub fn new(user_id: UserId, ttl: Duration, device_id: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            token: random_urlsafe_token(TOKEN_ENTROPY_BYTES),
            user_id,
            expires_at: now + ttl,
            created_at: now,
            revoked: false,
            revoked_at: None,
            replaced_by_token: None,
            device_id,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Live iff not revoked and not expired
    pub fn is_live(&self) -> bool {
        !self.revoked && !self.is_expired()
    }

    /// True when this token was rotated forward. Distinguishes replayed
    /// rotated tokens (a security incident) from plain logout revocation.
    pub fn was_rotated(&self) -> bool {
        self.revoked && self.replaced_by_token.is_some()
    }
}
