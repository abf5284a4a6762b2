//! HTTP Handlers

use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect};
use axum::{Extension, Json};
use std::sync::Arc;

use platform::client::{extract_client_ip, extract_device_id};
use platform::mail::Mailer;

use crate::application::config::AuthConfig;
use crate::application::token::TokenSigner;
use crate::application::{
    ChangePasswordUseCase, GoogleOAuthUseCase, LoginInput, LoginUseCase, LogoutUseCase,
    ProfileUpdateInput, ProfileUseCase, RefreshUseCase, RegisterInput, RegisterUseCase,
    VerifyEmailUseCase,
};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    ChangePasswordRequest, GoogleCallbackQuery, GoogleLoginResponse, LoginForm, LogoutRequest,
    MessageResponse, RefreshRequest, RegisterRequest, ResendVerificationRequest,
    TokenPairResponse, UpdateProfileRequest, UserProfileResponse, UserResponse,
    VerifyEmailQuery, VerifyEmailResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, M>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub signer: Arc<TokenSigner>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /v1/auth/register
pub async fn register<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone());

    let user = use_case
        .execute(RegisterInput {
            email: req.email,
            full_name: req.full_name,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

// ============================================================================
// Login
// ============================================================================

/// POST /v1/auth/login
pub async fn login<R, M>(
    State(state): State<AuthAppState<R, M>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Form(form): Form<LoginForm>,
) -> AuthResult<Json<TokenPairResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let device_id = extract_device_id(&headers);
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));

    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    let pair = use_case
        .execute(LoginInput {
            email: form.username,
            password: form.password,
            device_id,
            client_ip: client_ip.map(|ip| ip.to_string()),
        })
        .await?;

    Ok(Json(TokenPairResponse::bearer(
        pair.access_token,
        pair.refresh_token,
    )))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /v1/auth/refresh
pub async fn refresh<R, M>(
    State(state): State<AuthAppState<R, M>>,
    headers: HeaderMap,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<TokenPairResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let device_id = extract_device_id(&headers);

    let use_case = RefreshUseCase::new(state.repo.clone(), state.signer.clone(), state.config.clone());

    let pair = use_case.execute(&req.refresh_token, device_id).await?;

    Ok(Json(TokenPairResponse::bearer(
        pair.access_token,
        pair.refresh_token,
    )))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /v1/auth/logout
pub async fn logout<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<LogoutRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = LogoutUseCase::new(state.repo.clone());
    use_case.execute(&req.refresh_token).await?;

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

// ============================================================================
// Email Verification
// ============================================================================

/// GET /v1/auth/verify-email?token=...
pub async fn verify_email<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Query(query): Query<VerifyEmailQuery>,
) -> AuthResult<Json<VerifyEmailResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case =
        VerifyEmailUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone());

    let output = use_case.verify(&query.token).await?;

    Ok(Json(VerifyEmailResponse {
        message: "Email verified successfully. You can now log in".to_string(),
        email: output.email,
    }))
}

/// POST /v1/auth/resend-verification
pub async fn resend_verification<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<ResendVerificationRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case =
        VerifyEmailUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone());

    // Same answer whether or not the email exists
    let _ = use_case.resend(&req.email).await?;

    Ok(Json(MessageResponse {
        message: "If the email exists and is not verified, a verification email has been sent"
            .to_string(),
    }))
}

// ============================================================================
// Google OAuth
// ============================================================================

/// GET /v1/auth/google/login
pub async fn google_login<R, M>(
    State(state): State<AuthAppState<R, M>>,
) -> AuthResult<Json<GoogleLoginResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = GoogleOAuthUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    Ok(Json(GoogleLoginResponse {
        auth_url: use_case.authorize_url()?,
    }))
}

/// GET /v1/auth/google/callback?code=...
pub async fn google_callback<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Query(query): Query<GoogleCallbackQuery>,
) -> AuthResult<Redirect>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = GoogleOAuthUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    let output = use_case.callback(&query.code).await?;

    Ok(Redirect::to(&output.redirect_url))
}

// ============================================================================
// User Profile (behind require_auth)
// ============================================================================

/// GET /v1/users/me
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<UserProfileResponse> {
    Json(UserProfileResponse::from(&current.0))
}

/// PATCH /v1/users/me
pub async fn update_me<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<UserProfileResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.repo.clone());

    let updated = use_case
        .update(
            current.0,
            ProfileUpdateInput {
                full_name: req.full_name,
                phone: req.phone,
                avatar_url: req.avatar_url,
                company_name: req.company_name,
                company_logo_url: req.company_logo_url,
                company_address: req.company_address,
                tax_id: req.tax_id,
                website: req.website,
            },
        )
        .await?;

    Ok(Json(UserProfileResponse::from(&updated)))
}

/// POST /v1/users/me/password
pub async fn change_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(current.0, req.current_password, req.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}
