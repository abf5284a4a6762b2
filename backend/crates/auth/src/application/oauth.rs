//! Google OAuth Use Case
//!
//! Consent-URL construction, authorization-code exchange, and account
//! linking. The provider's email-verified claim is trusted for newly
//! created accounts; existing accounts are only ever promoted, never
//! demoted.

use std::sync::Arc;

use serde::Deserialize;

use crate::application::config::{AuthConfig, GoogleOAuthConfig};
use crate::application::login::TokenPair;
use crate::application::token::TokenSigner;
use crate::domain::entity::refresh_token::RefreshToken;
use crate::domain::entity::user::{OAuthLink, User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

const PROVIDER: &str = "google";

/// Token endpoint response (fields we use)
#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

/// OpenID Connect userinfo response
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
    picture: Option<String>,
}

/// Callback outcome: issued pair plus the frontend redirect target
pub struct CallbackOutput {
    pub tokens: TokenPair,
    pub redirect_url: String,
}

/// Google OAuth use case
pub struct GoogleOAuthUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<R>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<U, R> GoogleOAuthUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<R>,
        signer: Arc<TokenSigner>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            signer,
            config,
        }
    }

    fn google(&self) -> AuthResult<&GoogleOAuthConfig> {
        self.config.google.as_ref().ok_or(AuthError::OAuthNotConfigured)
    }

    /// Build the consent-screen URL the frontend redirects to
    pub fn authorize_url(&self) -> AuthResult<String> {
        let google = self.google()?;

        let url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=select_account",
            GOOGLE_AUTH_URL,
            urlencoding::encode(&google.client_id),
            urlencoding::encode(&google.redirect_uri),
            urlencoding::encode("openid email profile"),
        );

        Ok(url)
    }

    /// Exchange the authorization code, link or create the account, and
    /// issue a token pair
    pub async fn callback(&self, code: &str) -> AuthResult<CallbackOutput> {
        let google = self.google()?;

        let identity = self.fetch_identity(google, code).await?;

        let email_str = identity
            .email
            .ok_or_else(|| AuthError::OAuthExchangeFailed("Email not provided by Google".to_string()))?;
        let email = Email::new(email_str)
            .map_err(|e| AuthError::OAuthExchangeFailed(e.message().to_string()))?;

        // Email first, then the provider subject - an account that
        // changed its Google email is still found by subject.
        let existing = match self.user_repo.find_by_email(&email).await? {
            Some(user) => Some(user),
            None => self.user_repo.find_by_oauth(PROVIDER, &identity.sub).await?,
        };

        let user = match existing {
            Some(mut user) => {
                user.link_oauth(OAuthLink {
                    provider: PROVIDER.to_string(),
                    subject: identity.sub.clone(),
                });
                user.adopt_avatar(identity.picture.clone());
                user.promote_verification(identity.email_verified);
                self.user_repo.update(&user).await?;
                user
            }
            None => {
                let user = User::new_oauth(
                    email,
                    identity.name.clone(),
                    OAuthLink {
                        provider: PROVIDER.to_string(),
                        subject: identity.sub.clone(),
                    },
                    identity.picture.clone(),
                    identity.email_verified,
                );
                self.user_repo.create(&user).await?;
                tracing::info!(user_id = %user.user_id, "User created via Google OAuth");
                user
            }
        };

        // Symmetric with password login: OAuth sessions also get a
        // refresh token.
        let access_token = self.signer.issue(&user.user_id)?;
        let refresh = RefreshToken::new(user.user_id, self.config.refresh_token_ttl_chrono(), None);
        self.token_repo.create(&refresh).await?;

        let redirect_url = format!(
            "{}/auth/callback?token={}&refresh_token={}",
            self.config.frontend_url,
            urlencoding::encode(&access_token),
            urlencoding::encode(&refresh.token),
        );

        tracing::info!(user_id = %user.user_id, "User logged in via Google OAuth");

        Ok(CallbackOutput {
            tokens: TokenPair {
                access_token,
                refresh_token: refresh.token,
            },
            redirect_url,
        })
    }

    /// Exchange the code for tokens and fetch the OpenID identity
    async fn fetch_identity(
        &self,
        google: &GoogleOAuthConfig,
        code: &str,
    ) -> AuthResult<GoogleUserInfo> {
        let client = reqwest::Client::new();

        let token_response = client
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", google.client_id.as_str()),
                ("client_secret", google.client_secret.as_str()),
                ("redirect_uri", google.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AuthError::OAuthExchangeFailed(e.to_string()))?;

        if !token_response.status().is_success() {
            return Err(AuthError::OAuthExchangeFailed(format!(
                "Token endpoint returned status {}",
                token_response.status()
            )));
        }

        let tokens: GoogleTokenResponse = token_response
            .json()
            .await
            .map_err(|e| AuthError::OAuthExchangeFailed(e.to_string()))?;

        let userinfo_response = client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .map_err(|e| AuthError::OAuthExchangeFailed(e.to_string()))?;

        if !userinfo_response.status().is_success() {
            return Err(AuthError::OAuthExchangeFailed(format!(
                "Userinfo endpoint returned status {}",
                userinfo_response.status()
            )));
        }

        userinfo_response
            .json()
            .await
            .map_err(|e| AuthError::OAuthExchangeFailed(e.to_string()))
    }
}
