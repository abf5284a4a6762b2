//! Email Verification Use Case
//!
//! Verifies accounts via the emailed token and handles resends.

use std::sync::Arc;

use platform::crypto::random_urlsafe_token;
use platform::mail::Mailer;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

const VERIFICATION_TOKEN_BYTES: usize = 32;

/// Outcome of a successful verification
pub struct VerifiedOutput {
    pub email: String,
}

/// Outcome of a resend request. `sent` stays internal; the HTTP answer
/// is the same whether or not the email exists.
pub struct ResendOutput {
    pub sent: bool,
}

/// Email verification use case
pub struct VerifyEmailUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, M> VerifyEmailUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    pub fn new(user_repo: Arc<U>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            mailer,
            config,
        }
    }

    /// Flip the verification flag for the account holding `token`
    pub async fn verify(&self, token: &str) -> AuthResult<VerifiedOutput> {
        let mut user = self
            .user_repo
            .find_by_verification_token(token)
            .await?
            .ok_or(AuthError::InvalidVerificationToken)?;

        if user.verification_token_expired() {
            return Err(AuthError::VerificationTokenExpired);
        }

        user.mark_verified();
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, "Email verified");

        Ok(VerifiedOutput {
            email: user.email.as_str().to_string(),
        })
    }

    /// Issue a fresh token and resend the verification email.
    ///
    /// An unknown email is not an error - the response must not reveal
    /// which addresses are registered.
    pub async fn resend(&self, email: &str) -> AuthResult<ResendOutput> {
        let email = Email::new(email)?;

        let Some(mut user) = self.user_repo.find_by_email(&email).await? else {
            return Ok(ResendOutput { sent: false });
        };

        if user.is_verified {
            return Err(AuthError::AlreadyVerified);
        }

        user.set_verification_token(
            random_urlsafe_token(VERIFICATION_TOKEN_BYTES),
            self.config.verification_token_ttl_chrono(),
        );
        self.user_repo.update(&user).await?;

        let token = user
            .verification_token
            .as_deref()
            .ok_or_else(|| AuthError::Internal("Verification token missing after set".to_string()))?;

        let url = self.config.verification_url(token);
        self.mailer
            .send_verification_email(user.email.as_str(), &url, user.full_name.as_deref())
            .await
            .map_err(|e| AuthError::Internal(format!("Failed to send verification email: {}", e)))?;

        tracing::info!(user_id = %user.user_id, "Verification email resent");

        Ok(ResendOutput { sent: true })
    }
}
