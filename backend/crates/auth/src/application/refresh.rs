//! Refresh Use Case
//!
//! Single-use refresh-token rotation with reuse detection.
//!
//! Per-lineage state machine:
//!
//! ```text
//! create() --> LIVE --revoke(logout)--> REVOKED(no replacement)     [terminal, benign]
//! LIVE --rotate--> REVOKED(replacement = T2) --> T2 is now LIVE     [normal chain]
//! presenting REVOKED(replacement = X) again --> reuse detected --> revoke_all_for_user()
//! ```

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::login::TokenPair;
use crate::application::token::TokenSigner;
use crate::domain::entity::refresh_token::RefreshToken;
use crate::domain::repository::RefreshTokenRepository;
use crate::error::{AuthError, AuthResult};

/// Refresh use case
pub struct RefreshUseCase<R>
where
    R: RefreshTokenRepository,
{
    token_repo: Arc<R>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<R> RefreshUseCase<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(token_repo: Arc<R>, signer: Arc<TokenSigner>, config: Arc<AuthConfig>) -> Self {
        Self {
            token_repo,
            signer,
            config,
        }
    }

    pub async fn execute(
        &self,
        presented: &str,
        device_id: Option<String>,
    ) -> AuthResult<TokenPair> {
        // Reuse check comes first: a rotated token being replayed means
        // someone else already holds its replacement. Contain before
        // reporting.
        if self.token_repo.detect_reuse(presented).await? {
            if let Some(record) = self.token_repo.find_by_token(presented).await? {
                let revoked = self.token_repo.revoke_all_for_user(&record.user_id).await?;
                tracing::warn!(
                    user_id = %record.user_id,
                    tokens_revoked = revoked,
                    "Refresh token reuse detected, all sessions revoked"
                );
            }
            return Err(AuthError::ReuseDetected);
        }

        if !self.token_repo.is_valid(presented).await? {
            return Err(AuthError::InvalidRefreshToken);
        }

        let old = self
            .token_repo
            .find_by_token(presented)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        // Device id carries forward unless the caller supplies a new one
        let replacement = RefreshToken::new(
            old.user_id,
            self.config.refresh_token_ttl_chrono(),
            device_id.or(old.device_id),
        );
        self.token_repo.create(&replacement).await?;

        // The conditional revoke is the rotation gate: it only touches a
        // row that is still unrevoked, so of two concurrent refreshes of
        // the same token exactly one sees a row change.
        let rotated = self
            .token_repo
            .revoke(presented, Some(&replacement.token))
            .await?;

        if !rotated {
            // Lost the race (or the token was revoked in between). Undo
            // the speculative child so no orphan session stays live.
            let _ = self.token_repo.revoke(&replacement.token, None).await;
            tracing::warn!(
                user_id = %old.user_id,
                "Concurrent refresh detected, rotation aborted"
            );
            return Err(AuthError::InvalidRefreshToken);
        }

        let access_token = self.signer.issue(&old.user_id)?;

        tracing::debug!(user_id = %old.user_id, "Refresh token rotated");

        Ok(TokenPair {
            access_token,
            refresh_token: replacement.token,
        })
    }
}
