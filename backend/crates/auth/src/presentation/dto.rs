//! API DTOs (Data Transfer Objects)
//!
//! Wire shapes are snake_case; the token-pair contract
//! (`access_token`, `refresh_token`, `token_type`) is stable.

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
}

/// Public view of a user account after registration
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_verified: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            full_name: user.full_name.clone(),
            is_verified: user.is_verified,
        }
    }
}

// ============================================================================
// Login / Refresh / Logout
// ============================================================================

/// Login form body (OAuth2 password-grant style field names)
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Issued token pair
#[derive(Debug, Clone, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenPairResponse {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Logout request
#[derive(Debug, Clone, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Generic message response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Email Verification
// ============================================================================

/// Query string of the verification link
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}

/// Response after successful email verification
#[derive(Debug, Clone, Serialize)]
pub struct VerifyEmailResponse {
    pub message: String,
    pub email: String,
}

/// Request to resend the verification email
#[derive(Debug, Clone, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

// ============================================================================
// Google OAuth
// ============================================================================

/// Consent URL response
#[derive(Debug, Clone, Serialize)]
pub struct GoogleLoginResponse {
    pub auth_url: String,
}

/// Callback query string
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: String,
}

// ============================================================================
// User Profile
// ============================================================================

/// Full profile view for the authenticated user
#[derive(Debug, Clone, Serialize)]
pub struct UserProfileResponse {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
    pub company_address: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
}

impl From<&User> for UserProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
            is_verified: user.is_verified,
            avatar_url: user.profile.avatar_url.clone(),
            phone: user.profile.phone.clone(),
            company_name: user.profile.company_name.clone(),
            company_logo_url: user.profile.company_logo_url.clone(),
            company_address: user.profile.company_address.clone(),
            tax_id: user.profile.tax_id.clone(),
            website: user.profile.website.clone(),
        }
    }
}

/// Change (or first-set, for OAuth-only accounts) the password
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    /// Required when the account already has a password
    pub current_password: Option<String>,
    pub new_password: String,
}

/// Partial profile update request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
    pub company_address: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
}
