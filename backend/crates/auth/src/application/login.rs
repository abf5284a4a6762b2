//! Login Use Case
//!
//! Password authentication issuing an access/refresh token pair.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenSigner;
use crate::domain::entity::refresh_token::RefreshToken;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
    /// Opaque per-device label from the X-Device-Id header
    pub device_id: Option<String>,
    /// Client IP, for the audit log only
    pub client_ip: Option<String>,
}

/// Issued token pair
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Login use case
pub struct LoginUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<R>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<U, R> LoginUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<R>,
        signer: Arc<TokenSigner>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            signer,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<TokenPair> {
        // Every credential failure collapses into the same error so the
        // caller cannot tell "no such email" from "wrong password".
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // OAuth-only accounts have no hash; a password login against
        // them is indistinguishable from a wrong password.
        let password_hash = user
            .password_hash
            .as_ref()
            .ok_or(AuthError::InvalidCredentials)?;

        let presented = RawPassword::presented(input.password);
        if !password_hash.verify(&presented, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        // Checked only after the credentials are confirmed valid, so it
        // cannot be used to probe which emails are registered.
        if !user.is_verified {
            return Err(AuthError::EmailNotVerified);
        }

        let access_token = self.signer.issue(&user.user_id)?;

        let refresh = RefreshToken::new(
            user.user_id,
            self.config.refresh_token_ttl_chrono(),
            input.device_id,
        );
        self.token_repo.create(&refresh).await?;

        tracing::info!(
            user_id = %user.user_id,
            device_id = refresh.device_id.as_deref().unwrap_or("-"),
            client_ip = input.client_ip.as_deref().unwrap_or("-"),
            "User logged in"
        );

        Ok(TokenPair {
            access_token,
            refresh_token: refresh.token,
        })
    }
}
