//! Current User Use Case
//!
//! The session consumer: resolves a bearer access token to a full
//! identity on every protected request. One signature check plus one
//! indexed point lookup - this is the hot path of the whole API.

use std::sync::Arc;

use crate::application::token::TokenSigner;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Current user resolution use case
pub struct CurrentUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    signer: Arc<TokenSigner>,
}

impl<U> CurrentUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, signer: Arc<TokenSigner>) -> Self {
        Self { user_repo, signer }
    }

    /// Verify the token and resolve its subject.
    ///
    /// The decoded subject is never trusted on its own: a token for a
    /// deleted or deactivated account fails even with a valid signature.
    pub async fn execute(&self, bearer_token: &str) -> AuthResult<User> {
        let user_id = self.signer.verify(bearer_token)?;

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        if !user.can_login() {
            return Err(AuthError::Unauthenticated);
        }

        Ok(user)
    }
}
