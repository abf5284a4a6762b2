//! Unit tests for the auth crate
//!
//! Protocol tests run against in-memory repository implementations; the
//! conditional revoke is atomic under one mutex guard, mirroring the
//! SQL compare-and-revoke.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::token::TokenSigner;
use crate::application::{
    ChangePasswordUseCase, CurrentUserUseCase, LoginInput, LoginUseCase, LogoutUseCase,
    RefreshUseCase, RegisterInput, RegisterUseCase, VerifyEmailUseCase,
};
use crate::domain::entity::refresh_token::RefreshToken;
use crate::domain::entity::user::{OAuthLink, User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};
use platform::mail::TracingMailer;

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Clone, Default)]
struct MemoryAuthStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    tokens: Arc<Mutex<HashMap<String, RefreshToken>>>,
}

impl MemoryAuthStore {
    fn new() -> Self {
        Self::default()
    }

    fn verification_token_of(&self, email: &str) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.as_str() == email)
            .and_then(|u| u.verification_token.clone())
    }

    fn token_record(&self, token: &str) -> Option<RefreshToken> {
        self.tokens.lock().unwrap().get(token).cloned()
    }

    fn all_tokens_for(&self, user_id: &crate::domain::value_object::user_id::UserId) -> Vec<RefreshToken> {
        self.tokens
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.user_id == *user_id)
            .cloned()
            .collect()
    }
}

impl UserRepository for MemoryAuthStore {
    async fn create(&self, user: &User) -> AuthResult<()> {
        self.users
            .lock()
            .unwrap()
            .insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        user_id: &crate::domain::value_object::user_id::UserId,
    ) -> AuthResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(user_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn find_by_oauth(&self, provider: &str, subject: &str) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| {
                u.oauth
                    .as_ref()
                    .is_some_and(|o| o.provider == provider && o.subject == subject)
            })
            .cloned())
    }

    async fn find_by_verification_token(&self, token: &str) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.email == *email))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        self.users
            .lock()
            .unwrap()
            .insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }
}

impl RefreshTokenRepository for MemoryAuthStore {
    async fn create(&self, token: &RefreshToken) -> AuthResult<()> {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshToken>> {
        Ok(self.tokens.lock().unwrap().get(token).cloned())
    }

    async fn is_valid(&self, token: &str) -> AuthResult<bool> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .get(token)
            .is_some_and(|t| t.is_live()))
    }

    async fn detect_reuse(&self, token: &str) -> AuthResult<bool> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .get(token)
            .is_some_and(|t| t.was_rotated()))
    }

    async fn revoke(&self, token: &str, replaced_by: Option<&str>) -> AuthResult<bool> {
        // Single guard: check-and-set is atomic like the SQL
        // `UPDATE ... WHERE revoked = FALSE`
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.get_mut(token) {
            Some(record) if !record.revoked => {
                record.revoked = true;
                record.revoked_at = Some(Utc::now());
                record.replaced_by_token = replaced_by.map(str::to_string);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(
        &self,
        user_id: &crate::domain::value_object::user_id::UserId,
    ) -> AuthResult<u64> {
        let mut tokens = self.tokens.lock().unwrap();
        let mut revoked = 0;
        for record in tokens.values_mut() {
            if record.user_id == *user_id && !record.revoked {
                record.revoked = true;
                record.revoked_at = Some(Utc::now());
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|_, t| !t.is_expired());
        Ok((before - tokens.len()) as u64)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn config() -> Arc<AuthConfig> {
    Arc::new(AuthConfig::with_random_secret())
}

fn signer(config: &AuthConfig) -> Arc<TokenSigner> {
    Arc::new(TokenSigner::from_config(config))
}

fn verified_user(store: &MemoryAuthStore, email: &str, password: &str) -> User {
    let raw = RawPassword::new(password.to_string()).unwrap();
    let hash = UserPassword::from_raw(&raw, None).unwrap();
    let mut user = User::new_local(Email::new(email).unwrap(), None, hash);
    user.mark_verified();
    store
        .users
        .lock()
        .unwrap()
        .insert(*user.user_id.as_uuid(), user.clone());
    user
}

fn login_use_case(
    store: &Arc<MemoryAuthStore>,
    config: &Arc<AuthConfig>,
) -> LoginUseCase<MemoryAuthStore, MemoryAuthStore> {
    LoginUseCase::new(
        store.clone(),
        store.clone(),
        signer(config),
        config.clone(),
    )
}

fn refresh_use_case(
    store: &Arc<MemoryAuthStore>,
    config: &Arc<AuthConfig>,
) -> RefreshUseCase<MemoryAuthStore> {
    RefreshUseCase::new(store.clone(), signer(config), config.clone())
}

fn login_input(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_string(),
        password: password.to_string(),
        device_id: None,
        client_ip: None,
    }
}

// ============================================================================
// Login
// ============================================================================

#[cfg(test)]
mod login_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_returns_pair_for_verified_account() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        verified_user(&store, "ada@example.com", "enigma1machine");

        let pair = login_use_case(&store, &config)
            .execute(login_input("ada@example.com", "enigma1machine"))
            .await
            .unwrap();

        assert!(!pair.access_token.is_empty());
        assert!(store.token_record(&pair.refresh_token).unwrap().is_live());
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        verified_user(&store, "ada@example.com", "enigma1machine");

        let unknown = login_use_case(&store, &config)
            .execute(login_input("nobody@example.com", "enigma1machine"))
            .await;
        let wrong = login_use_case(&store, &config)
            .execute(login_input("ada@example.com", "wrong2password"))
            .await;

        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_oauth_only_account_rejects_password_login() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();

        let user = User::new_oauth(
            Email::new("oauth@example.com").unwrap(),
            None,
            OAuthLink {
                provider: "google".to_string(),
                subject: "sub-1".to_string(),
            },
            None,
            true,
        );
        store
            .users
            .lock()
            .unwrap()
            .insert(*user.user_id.as_uuid(), user);

        let result = login_use_case(&store, &config)
            .execute(login_input("oauth@example.com", "any3password"))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unverified_account_is_rejected_after_credential_check() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();

        let raw = RawPassword::new("enigma1machine".to_string()).unwrap();
        let hash = UserPassword::from_raw(&raw, None).unwrap();
        let user = User::new_local(Email::new("new@example.com").unwrap(), None, hash);
        store
            .users
            .lock()
            .unwrap()
            .insert(*user.user_id.as_uuid(), user);

        // Right password, unverified account
        let result = login_use_case(&store, &config)
            .execute(login_input("new@example.com", "enigma1machine"))
            .await;
        assert!(matches!(result, Err(AuthError::EmailNotVerified)));

        // Wrong password on the same unverified account must NOT leak
        // the verification state
        let result = login_use_case(&store, &config)
            .execute(login_input("new@example.com", "wrong2password"))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}

// ============================================================================
// Refresh rotation and reuse detection
// ============================================================================

#[cfg(test)]
mod refresh_tests {
    use super::*;

    #[tokio::test]
    async fn test_refresh_succeeds_exactly_once() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        let user = verified_user(&store, "ada@example.com", "enigma1machine");

        let pair = login_use_case(&store, &config)
            .execute(login_input("ada@example.com", "enigma1machine"))
            .await
            .unwrap();

        let refresh = refresh_use_case(&store, &config);

        // First use rotates
        let rotated = refresh.execute(&pair.refresh_token, None).await.unwrap();
        assert_ne!(rotated.refresh_token, pair.refresh_token);

        // The old record points forward to its replacement
        let old = store.token_record(&pair.refresh_token).unwrap();
        assert!(old.revoked);
        assert_eq!(old.replaced_by_token.as_deref(), Some(rotated.refresh_token.as_str()));

        // Second use of the same token is reuse, and containment
        // revokes everything the user holds
        let replay = refresh.execute(&pair.refresh_token, None).await;
        assert!(matches!(replay, Err(AuthError::ReuseDetected)));

        for token in store.all_tokens_for(&user.user_id) {
            assert!(!token.is_live());
        }

        // The rotated-forward child was revoked by the cascade too
        let after_cascade = refresh.execute(&rotated.refresh_token, None).await;
        assert!(matches!(after_cascade, Err(AuthError::InvalidRefreshToken)));
    }

    #[tokio::test]
    async fn test_expired_token_is_plain_invalid_not_reuse() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        let user = verified_user(&store, "ada@example.com", "enigma1machine");

        let expired = RefreshToken {
            expires_at: Utc::now() - Duration::hours(1),
            ..RefreshToken::new(user.user_id, Duration::days(7), None)
        };
        RefreshTokenRepository::create(store.as_ref(), &expired)
            .await
            .unwrap();

        let result = refresh_use_case(&store, &config)
            .execute(&expired.token, None)
            .await;

        assert!(matches!(result, Err(AuthError::InvalidRefreshToken)));
    }

    #[tokio::test]
    async fn test_logout_then_refresh_is_plain_invalid_not_reuse() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        verified_user(&store, "ada@example.com", "enigma1machine");

        let pair = login_use_case(&store, &config)
            .execute(login_input("ada@example.com", "enigma1machine"))
            .await
            .unwrap();

        LogoutUseCase::new(store.clone())
            .execute(&pair.refresh_token)
            .await
            .unwrap();

        // Logout revocation has no forward pointer, so this is not a
        // security incident
        let result = refresh_use_case(&store, &config)
            .execute(&pair.refresh_token, None)
            .await;
        assert!(matches!(result, Err(AuthError::InvalidRefreshToken)));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent_and_silent() {
        let store = Arc::new(MemoryAuthStore::new());
        let logout = LogoutUseCase::new(store.clone());

        // Unknown token: still success
        assert!(logout.execute("no-such-token").await.is_ok());

        // Double logout: still success
        let config = config();
        verified_user(&store, "ada@example.com", "enigma1machine");
        let pair = login_use_case(&store, &config)
            .execute(login_input("ada@example.com", "enigma1machine"))
            .await
            .unwrap();
        assert!(logout.execute(&pair.refresh_token).await.is_ok());
        assert!(logout.execute(&pair.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_device_id_carries_forward_unless_replaced() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        let user = verified_user(&store, "ada@example.com", "enigma1machine");

        let original = RefreshToken::new(
            user.user_id,
            Duration::days(7),
            Some("laptop".to_string()),
        );
        RefreshTokenRepository::create(store.as_ref(), &original)
            .await
            .unwrap();

        let refresh = refresh_use_case(&store, &config);

        let rotated = refresh.execute(&original.token, None).await.unwrap();
        assert_eq!(
            store
                .token_record(&rotated.refresh_token)
                .unwrap()
                .device_id
                .as_deref(),
            Some("laptop")
        );

        let rotated_again = refresh
            .execute(&rotated.refresh_token, Some("phone".to_string()))
            .await
            .unwrap();
        assert_eq!(
            store
                .token_record(&rotated_again.refresh_token)
                .unwrap()
                .device_id
                .as_deref(),
            Some("phone")
        );
    }

    #[tokio::test]
    async fn test_concurrent_refresh_has_exactly_one_winner() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        verified_user(&store, "ada@example.com", "enigma1machine");

        let pair = login_use_case(&store, &config)
            .execute(login_input("ada@example.com", "enigma1machine"))
            .await
            .unwrap();

        let refresh_a = refresh_use_case(&store, &config);
        let refresh_b = refresh_use_case(&store, &config);

        let (a, b) = tokio::join!(
            refresh_a.execute(&pair.refresh_token, None),
            refresh_b.execute(&pair.refresh_token, None),
        );

        let successes = [a.is_ok(), b.is_ok()].iter().filter(|&&ok| ok).count();
        assert_eq!(successes, 1, "exactly one concurrent refresh may win");

        // The loser's speculative replacement must not be live
        let winner_token = if let Ok(pair) = &a {
            pair.refresh_token.clone()
        } else {
            b.as_ref().unwrap().refresh_token.clone()
        };
        let live: Vec<_> = store
            .tokens
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.is_live())
            .map(|t| t.token.clone())
            .collect();
        assert_eq!(live, vec![winner_token]);
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_expired() {
        let store = Arc::new(MemoryAuthStore::new());
        let user = verified_user(&store, "ada@example.com", "enigma1machine");

        let live = RefreshToken::new(user.user_id, Duration::days(7), None);
        let expired = RefreshToken {
            expires_at: Utc::now() - Duration::hours(1),
            ..RefreshToken::new(user.user_id, Duration::days(7), None)
        };
        RefreshTokenRepository::create(store.as_ref(), &live)
            .await
            .unwrap();
        RefreshTokenRepository::create(store.as_ref(), &expired)
            .await
            .unwrap();

        let removed = store.cleanup_expired().await.unwrap();
        assert_eq!(removed, 1);
        assert!(store.token_record(&live.token).is_some());
        assert!(store.token_record(&expired.token).is_none());
    }
}

// ============================================================================
// Registration and email verification
// ============================================================================

#[cfg(test)]
mod register_tests {
    use super::*;

    fn register_use_case(
        store: &Arc<MemoryAuthStore>,
        config: &Arc<AuthConfig>,
    ) -> RegisterUseCase<MemoryAuthStore, TracingMailer> {
        RegisterUseCase::new(store.clone(), Arc::new(TracingMailer), config.clone())
    }

    fn verify_use_case(
        store: &Arc<MemoryAuthStore>,
        config: &Arc<AuthConfig>,
    ) -> VerifyEmailUseCase<MemoryAuthStore, TracingMailer> {
        VerifyEmailUseCase::new(store.clone(), Arc::new(TracingMailer), config.clone())
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput {
            email: email.to_string(),
            full_name: Some("Ada Lovelace".to_string()),
            password: "enigma1machine".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_unverified_account_with_token() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();

        let user = register_use_case(&store, &config)
            .execute(register_input("ada@example.com"))
            .await
            .unwrap();

        assert!(!user.is_verified);
        assert!(user.verification_token.is_some());
        assert!(user.has_password());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        let register = register_use_case(&store, &config);

        register
            .execute(register_input("ada@example.com"))
            .await
            .unwrap();

        let result = register.execute(register_input("ada@example.com")).await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_register_enforces_password_policy() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();

        let result = register_use_case(&store, &config)
            .execute(RegisterInput {
                email: "ada@example.com".to_string(),
                full_name: None,
                password: "nodigits".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_full_verification_flow() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();

        register_use_case(&store, &config)
            .execute(register_input("ada@example.com"))
            .await
            .unwrap();

        // Unverified: login fails with 403, not 401
        let login = login_use_case(&store, &config);
        let result = login
            .execute(login_input("ada@example.com", "enigma1machine"))
            .await;
        assert!(matches!(result, Err(AuthError::EmailNotVerified)));

        // Follow the emailed token
        let token = store.verification_token_of("ada@example.com").unwrap();
        let output = verify_use_case(&store, &config).verify(&token).await.unwrap();
        assert_eq!(output.email, "ada@example.com");

        // Now login succeeds
        let pair = login
            .execute(login_input("ada@example.com", "enigma1machine"))
            .await
            .unwrap();
        assert!(!pair.refresh_token.is_empty());

        // The token is single-use
        let replay = verify_use_case(&store, &config).verify(&token).await;
        assert!(matches!(replay, Err(AuthError::InvalidVerificationToken)));
    }

    #[tokio::test]
    async fn test_verify_rejects_unknown_and_expired_tokens() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        let verify = verify_use_case(&store, &config);

        let result = verify.verify("unknown").await;
        assert!(matches!(result, Err(AuthError::InvalidVerificationToken)));

        // Expired token
        register_use_case(&store, &config)
            .execute(register_input("ada@example.com"))
            .await
            .unwrap();
        {
            let mut users = store.users.lock().unwrap();
            let user = users
                .values_mut()
                .find(|u| u.email.as_str() == "ada@example.com")
                .unwrap();
            user.verification_token_expires_at = Some(Utc::now() - Duration::hours(1));
        }
        let token = store.verification_token_of("ada@example.com").unwrap();
        let result = verify.verify(&token).await;
        assert!(matches!(result, Err(AuthError::VerificationTokenExpired)));
    }

    #[tokio::test]
    async fn test_resend_is_silent_for_unknown_email() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();

        let output = verify_use_case(&store, &config)
            .resend("ghost@example.com")
            .await
            .unwrap();
        assert!(!output.sent);
    }

    #[tokio::test]
    async fn test_resend_rejects_already_verified() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        verified_user(&store, "ada@example.com", "enigma1machine");

        let result = verify_use_case(&store, &config)
            .resend("ada@example.com")
            .await;
        assert!(matches!(result, Err(AuthError::AlreadyVerified)));
    }
}

// ============================================================================
// Change password
// ============================================================================

#[cfg(test)]
mod change_password_tests {
    use super::*;

    #[tokio::test]
    async fn test_change_password_requires_current_one() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        let user = verified_user(&store, "ada@example.com", "enigma1machine");

        let use_case = ChangePasswordUseCase::new(store.clone(), config.clone());

        // Missing current password
        let result = use_case
            .execute(user.clone(), None, "brandnew2password".to_string())
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        // Wrong current password
        let result = use_case
            .execute(
                user.clone(),
                Some("wrong2password".to_string()),
                "brandnew2password".to_string(),
            )
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        // Correct current password
        use_case
            .execute(
                user,
                Some("enigma1machine".to_string()),
                "brandnew2password".to_string(),
            )
            .await
            .unwrap();

        let login = login_use_case(&store, &config);
        assert!(
            login
                .execute(login_input("ada@example.com", "brandnew2password"))
                .await
                .is_ok()
        );
        assert!(matches!(
            login
                .execute(login_input("ada@example.com", "enigma1machine"))
                .await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_oauth_account_sets_first_password_without_current() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();

        let user = User::new_oauth(
            Email::new("oauth@example.com").unwrap(),
            None,
            OAuthLink {
                provider: "google".to_string(),
                subject: "sub-1".to_string(),
            },
            None,
            true,
        );
        UserRepository::create(store.as_ref(), &user).await.unwrap();

        ChangePasswordUseCase::new(store.clone(), config.clone())
            .execute(user, None, "brandnew2password".to_string())
            .await
            .unwrap();

        // The account can now log in with a password too
        assert!(
            login_use_case(&store, &config)
                .execute(login_input("oauth@example.com", "brandnew2password"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_new_password_must_pass_policy() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        let user = verified_user(&store, "ada@example.com", "enigma1machine");

        let result = ChangePasswordUseCase::new(store.clone(), config.clone())
            .execute(
                user,
                Some("enigma1machine".to_string()),
                "nodigits".to_string(),
            )
            .await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }
}

// ============================================================================
// Session consumer
// ============================================================================

#[cfg(test)]
mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_access_token_resolves_to_user() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        let user = verified_user(&store, "ada@example.com", "enigma1machine");

        let signer = signer(&config);
        let token = signer.issue(&user.user_id).unwrap();

        let resolved = CurrentUserUseCase::new(store.clone(), signer)
            .execute(&token)
            .await
            .unwrap();
        assert_eq!(resolved.user_id, user.user_id);
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_is_rejected() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        let user = verified_user(&store, "ada@example.com", "enigma1machine");

        let signer = signer(&config);
        let token = signer.issue(&user.user_id).unwrap();

        // A valid signature is not enough once the subject is gone
        store.users.lock().unwrap().clear();

        let result = CurrentUserUseCase::new(store.clone(), signer)
            .execute(&token)
            .await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_token_for_deactivated_user_is_rejected() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();
        let user = verified_user(&store, "ada@example.com", "enigma1machine");

        let signer = signer(&config);
        let token = signer.issue(&user.user_id).unwrap();

        {
            let mut users = store.users.lock().unwrap();
            users.get_mut(user.user_id.as_uuid()).unwrap().is_active = false;
        }

        let result = CurrentUserUseCase::new(store.clone(), signer)
            .execute(&token)
            .await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_garbage_bearer_token_is_rejected() {
        let store = Arc::new(MemoryAuthStore::new());
        let config = config();

        let result = CurrentUserUseCase::new(store.clone(), signer(&config))
            .execute("garbage.token.here")
            .await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }
}

// ============================================================================
// Error mapping
// ============================================================================

#[cfg(test)]
mod error_tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::EmailNotVerified, StatusCode::FORBIDDEN),
            (AuthError::InvalidRefreshToken, StatusCode::UNAUTHORIZED),
            (AuthError::ReuseDetected, StatusCode::UNAUTHORIZED),
            (AuthError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (AuthError::EmailTaken, StatusCode::BAD_REQUEST),
            (AuthError::AlreadyVerified, StatusCode::BAD_REQUEST),
            (AuthError::InvalidVerificationToken, StatusCode::BAD_REQUEST),
            (AuthError::VerificationTokenExpired, StatusCode::BAD_REQUEST),
            (
                AuthError::OAuthNotConfigured,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::OAuthExchangeFailed("denied".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::Validation("bad email".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }

    #[test]
    fn test_reuse_detected_message_is_distinguishable() {
        // Clients must be able to tell reuse from a plain invalid token
        // to force a full re-login
        assert_ne!(
            AuthError::ReuseDetected.to_string(),
            AuthError::InvalidRefreshToken.to_string()
        );
    }
}
