//! Logout Use Case
//!
//! Revokes a refresh token with no replacement pointer.

use std::sync::Arc;

use crate::domain::repository::RefreshTokenRepository;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<R>
where
    R: RefreshTokenRepository,
{
    token_repo: Arc<R>,
}

impl<R> LogoutUseCase<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(token_repo: Arc<R>) -> Self {
        Self { token_repo }
    }

    /// Always succeeds from the caller's perspective. Whether the token
    /// existed or was already revoked is internal state and must not
    /// leak through logout.
    pub async fn execute(&self, presented: &str) -> AuthResult<()> {
        let revoked = self.token_repo.revoke(presented, None).await?;

        if revoked {
            tracing::info!("User logged out");
        } else {
            tracing::debug!("Logout with unknown or already-revoked token");
        }

        Ok(())
    }
}
