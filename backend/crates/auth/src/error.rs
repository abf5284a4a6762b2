//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. One variant per failure the HTTP
//! contract can surface; callers branch on the variant, never on text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad email or password. Deliberately covers "no such account",
    /// "OAuth-only account" and "wrong password" so callers cannot
    /// enumerate registered emails.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Credentials were valid but the email is not verified yet
    #[error("Email not verified. Check your inbox for the verification link")]
    EmailNotVerified,

    /// Refresh token is unknown, revoked (without rotation) or expired
    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    /// A rotated refresh token was presented again. Raising this variant
    /// carries a mandatory side effect: every live token of the owning
    /// user has been revoked before the error is returned.
    #[error("Refresh token reuse detected; all sessions have been revoked")]
    ReuseDetected,

    /// Missing, malformed or expired access token, or a subject that no
    /// longer resolves to a user
    #[error("Could not validate credentials")]
    Unauthenticated,

    /// Registration with an email that already has an account
    #[error("Email already registered")]
    EmailTaken,

    /// Verification requested for an already-verified account
    #[error("Email is already verified")]
    AlreadyVerified,

    /// Email verification token is unknown
    #[error("Invalid verification token")]
    InvalidVerificationToken,

    /// Email verification token has passed its expiry
    #[error("Verification token has expired. Request a new one")]
    VerificationTokenExpired,

    /// OAuth endpoints called without provider credentials configured
    #[error("OAuth provider not configured")]
    OAuthNotConfigured,

    /// The OAuth code exchange or identity fetch failed
    #[error("OAuth exchange failed: {0}")]
    OAuthExchangeFailed(String),

    /// Request payload failed domain validation
    #[error("{0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::InvalidRefreshToken
            | AuthError::ReuseDetected
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::EmailNotVerified => StatusCode::FORBIDDEN,
            AuthError::EmailTaken
            | AuthError::AlreadyVerified
            | AuthError::InvalidVerificationToken
            | AuthError::VerificationTokenExpired
            | AuthError::OAuthExchangeFailed(_)
            | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::OAuthNotConfigured
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::InvalidRefreshToken
            | AuthError::ReuseDetected
            | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::EmailNotVerified => ErrorKind::Forbidden,
            AuthError::EmailTaken
            | AuthError::AlreadyVerified
            | AuthError::InvalidVerificationToken
            | AuthError::VerificationTokenExpired
            | AuthError::OAuthExchangeFailed(_)
            | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::OAuthNotConfigured
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::OAuthNotConfigured => {
                tracing::error!("OAuth endpoint hit without provider configuration");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::ReuseDetected => {
                tracing::warn!("Refresh token reuse detected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                AuthError::Validation(err.message().to_string())
            }
            _ => AuthError::Internal(err.to_string()),
        }
    }
}
