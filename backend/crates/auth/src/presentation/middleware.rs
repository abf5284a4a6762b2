//! Auth Middleware
//!
//! Bearer-token authorization for protected routes. Runs on every
//! protected request: one signature check, one indexed lookup.

use axum::body::Body;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::CurrentUserUseCase;
use crate::application::token::TokenSigner;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub signer: Arc<TokenSigner>,
}

/// Authenticated principal, inserted into request extensions for
/// downstream handlers
#[derive(Clone)]
pub struct CurrentUser(pub User);

/// Pull the token out of `Authorization: Bearer <token>`
pub fn extract_bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware that requires a valid access token and a resolvable user
pub async fn require_auth<R>(
    state: AuthMiddlewareState<R>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let Some(token) = extract_bearer_token(&req) else {
        return Err(AuthError::Unauthenticated.into_response());
    };

    let use_case = CurrentUserUseCase::new(state.repo.clone(), state.signer.clone());

    let user = match use_case.execute(token).await {
        Ok(user) => user,
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
