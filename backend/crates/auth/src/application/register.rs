//! Register Use Case
//!
//! Creates a new unverified account and hands the verification link to
//! the mail port.

use std::sync::Arc;

use platform::crypto::random_urlsafe_token;
use platform::mail::Mailer;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Entropy of the email verification token: 32 bytes
const VERIFICATION_TOKEN_BYTES: usize = 32;

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
}

/// Register use case
pub struct RegisterUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, M> RegisterUseCase<U, M>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        let email = Email::new(input.email)?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let raw_password = RawPassword::new(input.password)?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let mut user = User::new_local(email, input.full_name, password_hash);
        user.set_verification_token(
            random_urlsafe_token(VERIFICATION_TOKEN_BYTES),
            self.config.verification_token_ttl_chrono(),
        );

        self.user_repo.create(&user).await?;

        // Delivery failure must not fail registration; the user can ask
        // for a resend.
        if let Some(token) = user.verification_token.as_deref() {
            let url = self.config.verification_url(token);
            if let Err(e) = self
                .mailer
                .send_verification_email(user.email.as_str(), &url, user.full_name.as_deref())
                .await
            {
                tracing::warn!(
                    user_id = %user.user_id,
                    error = %e,
                    "Failed to send verification email"
                );
            }
        }

        tracing::info!(
            user_id = %user.user_id,
            email_domain = user.email.domain(),
            "User registered"
        );

        Ok(user)
    }
}
