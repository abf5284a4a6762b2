//! Profile Use Case
//!
//! Partial updates of the authenticated user's profile and business
//! details.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Default)]
pub struct ProfileUpdateInput {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
    pub company_address: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
}

/// Profile use case
pub struct ProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn update(&self, mut user: User, input: ProfileUpdateInput) -> AuthResult<User> {
        if let Some(full_name) = input.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(phone) = input.phone {
            user.profile.phone = Some(phone);
        }
        if let Some(avatar_url) = input.avatar_url {
            user.profile.avatar_url = Some(avatar_url);
        }
        if let Some(company_name) = input.company_name {
            user.profile.company_name = Some(company_name);
        }
        if let Some(company_logo_url) = input.company_logo_url {
            user.profile.company_logo_url = Some(company_logo_url);
        }
        if let Some(company_address) = input.company_address {
            user.profile.company_address = Some(company_address);
        }
        if let Some(tax_id) = input.tax_id {
            user.profile.tax_id = Some(tax_id);
        }
        if let Some(website) = input.website {
            user.profile.website = Some(website);
        }
        user.updated_at = chrono::Utc::now();

        self.user_repo.update(&user).await?;

        tracing::debug!(user_id = %user.user_id, "Profile updated");

        Ok(user)
    }
}
