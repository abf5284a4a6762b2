//! Change Password Use Case
//!
//! Changes the password of an authenticated user, or sets the first
//! one on an OAuth-only account.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Change password use case
pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Accounts with a password must present the current one. OAuth-only
    /// accounts set their first password without it (they are already
    /// authenticated by the bearer token).
    pub async fn execute(
        &self,
        mut user: User,
        current_password: Option<String>,
        new_password: String,
    ) -> AuthResult<()> {
        if let Some(existing) = user.password_hash.as_ref() {
            let presented = current_password
                .map(RawPassword::presented)
                .ok_or(AuthError::InvalidCredentials)?;

            if !existing.verify(&presented, self.config.pepper()) {
                return Err(AuthError::InvalidCredentials);
            }
        }

        let raw = RawPassword::new(new_password)?;
        user.password_hash = Some(UserPassword::from_raw(&raw, self.config.pepper())?);
        user.updated_at = chrono::Utc::now();

        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, "Password changed");

        Ok(())
    }
}
