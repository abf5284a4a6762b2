//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer.

use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::AuthResult;

/// User repository trait (the credential store)
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email (exact match on the stored lowercase form)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by linked OAuth identity
    async fn find_by_oauth(&self, provider: &str, subject: &str) -> AuthResult<Option<User>>;

    /// Find user by pending email-verification token
    async fn find_by_verification_token(&self, token: &str) -> AuthResult<Option<User>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Update user
    async fn update(&self, user: &User) -> AuthResult<()>;
}

/// Refresh token ledger trait.
///
/// The source of truth for session liveness and the reuse-detection
/// trail.
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Persist a freshly minted token
    async fn create(&self, token: &RefreshToken) -> AuthResult<()>;

    /// Exact lookup by token string
    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshToken>>;

    /// True iff the record exists, is not revoked, and has not expired.
    /// Fails closed: a missing record is invalid.
    async fn is_valid(&self, token: &str) -> AuthResult<bool>;

    /// True iff the record exists, is revoked, AND has a forward
    /// pointer. Logout revocation (no replacement) is not reuse.
    async fn detect_reuse(&self, token: &str) -> AuthResult<bool>;

    /// Conditionally revoke: only a currently-unrevoked row is updated.
    /// Returns false when zero rows changed (missing or already
    /// revoked) - callers must tolerate this; a second revoke is a
    /// no-op, not an error. Rotation success is gated on this result.
    async fn revoke(&self, token: &str, replaced_by: Option<&str>) -> AuthResult<bool>;

    /// Revoke every live token of a user with no forward pointer.
    /// Breach containment, used exactly once per confirmed reuse.
    async fn revoke_all_for_user(&self, user_id: &UserId) -> AuthResult<u64>;

    /// Delete rows past their expiry. Advisory maintenance; safe to run
    /// concurrently with everything else.
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
