//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use platform::mail::{Mailer, TracingMailer};

use crate::application::config::AuthConfig;
use crate::application::token::TokenSigner;
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the public auth router with the PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, TracingMailer, config)
}

/// Create a public auth router for any repository/mailer implementation
pub fn auth_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let state = app_state(repo, mailer, config);

    Router::new()
        .route("/register", post(handlers::register::<R, M>))
        .route("/login", post(handlers::login::<R, M>))
        .route("/refresh", post(handlers::refresh::<R, M>))
        .route("/logout", post(handlers::logout::<R, M>))
        .route("/verify-email", get(handlers::verify_email::<R, M>))
        .route(
            "/resend-verification",
            post(handlers::resend_verification::<R, M>),
        )
        .route("/google/login", get(handlers::google_login::<R, M>))
        .route("/google/callback", get(handlers::google_callback::<R, M>))
        .with_state(state)
}

/// Create the protected user-profile router (caller applies the auth
/// middleware)
pub fn users_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let state = app_state(repo, mailer, config);

    Router::new()
        .route(
            "/me",
            get(handlers::me).patch(handlers::update_me::<R, M>),
        )
        .route("/me/password", post(handlers::change_password::<R, M>))
        .with_state(state)
}

fn app_state<R, M>(repo: R, mailer: M, config: AuthConfig) -> AuthAppState<R, M>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let signer = Arc::new(TokenSigner::from_config(&config));

    AuthAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        signer,
        config: Arc::new(config),
    }
}
