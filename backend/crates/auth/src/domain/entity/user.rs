//! User Entity
//!
//! The account identity. An account always carries at least one
//! authentication method: a password hash, an OAuth link, or both.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};

/// Linked third-party identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthLink {
    /// Provider name ("google")
    pub provider: String,
    /// The provider's stable subject identifier for this user
    pub subject: String,
}

/// Profile and business details shown on invoices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
    pub company_address: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
}

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, stored lowercased, compared exactly as stored
    pub email: Email,
    pub full_name: Option<String>,
    /// Absent for pure-OAuth accounts
    pub password_hash: Option<UserPassword>,
    pub is_active: bool,
    /// Flips true once; never demoted
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub verification_token_expires_at: Option<DateTime<Utc>>,
    pub oauth: Option<OAuthLink>,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new password-based user (unverified until the emailed
    /// link is followed)
    pub fn new_local(email: Email, full_name: Option<String>, password_hash: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            full_name,
            password_hash: Some(password_hash),
            is_active: true,
            is_verified: false,
            verification_token: None,
            verification_token_expires_at: None,
            oauth: None,
            profile: UserProfile::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new OAuth-only user.
    ///
    /// `verified` comes from the provider's own email-verified claim;
    /// trusting it is a deliberate policy.
    pub fn new_oauth(
        email: Email,
        full_name: Option<String>,
        link: OAuthLink,
        avatar_url: Option<String>,
        verified: bool,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            full_name,
            password_hash: None,
            is_active: true,
            is_verified: verified,
            verification_token: None,
            verification_token_expires_at: None,
            oauth: Some(link),
            profile: UserProfile {
                avatar_url,
                ..UserProfile::default()
            },
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Store a fresh verification token
    pub fn set_verification_token(&mut self, token: String, ttl: Duration) {
        let now = Utc::now();
        self.verification_token = Some(token);
        self.verification_token_expires_at = Some(now + ttl);
        self.updated_at = now;
    }

    pub fn verification_token_expired(&self) -> bool {
        match self.verification_token_expires_at {
            Some(expires_at) => expires_at < Utc::now(),
            None => false,
        }
    }

    /// Mark the email verified and clear the token fields
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.verification_token = None;
        self.verification_token_expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Attach an OAuth identity to an existing account. No-op when a
    /// link is already present.
    pub fn link_oauth(&mut self, link: OAuthLink) {
        if self.oauth.is_none() {
            self.oauth = Some(link);
            self.updated_at = Utc::now();
        }
    }

    /// Adopt the provider's avatar when none is set
    pub fn adopt_avatar(&mut self, avatar_url: Option<String>) {
        if self.profile.avatar_url.is_none() {
            if let Some(url) = avatar_url {
                self.profile.avatar_url = Some(url);
                self.updated_at = Utc::now();
            }
        }
    }

    /// Promote verification from a trusted provider claim. Never demotes.
    pub fn promote_verification(&mut self, provider_verified: bool) {
        if provider_verified && !self.is_verified {
            self.mark_verified();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;

    fn password() -> UserPassword {
        let raw = RawPassword::new("correcthorse1".to_string()).unwrap();
        UserPassword::from_raw(&raw, None).unwrap()
    }

    #[test]
    fn test_local_user_starts_unverified() {
        let user = User::new_local(Email::new("a@example.com").unwrap(), None, password());
        assert!(!user.is_verified);
        assert!(user.has_password());
        assert!(user.oauth.is_none());
    }

    #[test]
    fn test_oauth_user_trusts_provider_verification() {
        let link = OAuthLink {
            provider: "google".to_string(),
            subject: "sub-1".to_string(),
        };
        let user = User::new_oauth(
            Email::new("a@example.com").unwrap(),
            Some("Ada".to_string()),
            link,
            None,
            true,
        );
        assert!(user.is_verified);
        assert!(!user.has_password());
        assert!(user.oauth.is_some());
    }

    #[test]
    fn test_verification_token_lifecycle() {
        let mut user = User::new_local(Email::new("a@example.com").unwrap(), None, password());

        user.set_verification_token("tok".to_string(), Duration::hours(24));
        assert!(!user.verification_token_expired());

        user.mark_verified();
        assert!(user.is_verified);
        assert!(user.verification_token.is_none());
        assert!(user.verification_token_expires_at.is_none());
    }

    #[test]
    fn test_verification_token_expiry() {
        let mut user = User::new_local(Email::new("a@example.com").unwrap(), None, password());
        user.set_verification_token("tok".to_string(), Duration::hours(-1));
        assert!(user.verification_token_expired());
    }

    #[test]
    fn test_promote_never_demotes() {
        let mut user = User::new_local(Email::new("a@example.com").unwrap(), None, password());
        user.mark_verified();

        user.promote_verification(false);
        assert!(user.is_verified);
    }

    #[test]
    fn test_link_oauth_is_idempotent() {
        let mut user = User::new_local(Email::new("a@example.com").unwrap(), None, password());

        user.link_oauth(OAuthLink {
            provider: "google".to_string(),
            subject: "first".to_string(),
        });
        user.link_oauth(OAuthLink {
            provider: "google".to_string(),
            subject: "second".to_string(),
        });

        assert_eq!(user.oauth.as_ref().unwrap().subject, "first");
    }

    #[test]
    fn test_adopt_avatar_keeps_existing() {
        let mut user = User::new_local(Email::new("a@example.com").unwrap(), None, password());
        user.profile.avatar_url = Some("https://cdn/own.png".to_string());

        user.adopt_avatar(Some("https://provider/pic.png".to_string()));
        assert_eq!(
            user.profile.avatar_url.as_deref(),
            Some("https://cdn/own.png")
        );
    }
}
