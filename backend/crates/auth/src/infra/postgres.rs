//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::refresh_token::RefreshToken;
use crate::domain::entity::user::{OAuthLink, User, UserProfile};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete refresh tokens past their expiry
    pub async fn sweep_expired_tokens(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(tokens_deleted = deleted, "Cleaned up expired refresh tokens");

        Ok(deleted)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                full_name,
                password_hash,
                is_active,
                is_verified,
                verification_token,
                verification_token_expires_at,
                oauth_provider,
                oauth_subject,
                avatar_url,
                phone,
                company_name,
                company_logo_url,
                company_address,
                tax_id,
                website,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.full_name)
        .bind(user.password_hash.as_ref().map(|p| p.as_str()))
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(&user.verification_token)
        .bind(user.verification_token_expires_at)
        .bind(user.oauth.as_ref().map(|o| o.provider.as_str()))
        .bind(user.oauth.as_ref().map(|o| o.subject.as_str()))
        .bind(&user.profile.avatar_url)
        .bind(&user.profile.phone)
        .bind(&user.profile.company_name)
        .bind(&user.profile.company_logo_url)
        .bind(&user.profile.company_address)
        .bind(&user.profile.tax_id)
        .bind(&user.profile.website)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&select_user("WHERE user_id = $1"))
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&select_user("WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_oauth(&self, provider: &str, subject: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&select_user(
            "WHERE oauth_provider = $1 AND oauth_subject = $2",
        ))
        .bind(provider)
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_verification_token(&self, token: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&select_user("WHERE verification_token = $1"))
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                full_name = $3,
                password_hash = $4,
                is_active = $5,
                is_verified = $6,
                verification_token = $7,
                verification_token_expires_at = $8,
                oauth_provider = $9,
                oauth_subject = $10,
                avatar_url = $11,
                phone = $12,
                company_name = $13,
                company_logo_url = $14,
                company_address = $15,
                tax_id = $16,
                website = $17,
                updated_at = $18
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.full_name)
        .bind(user.password_hash.as_ref().map(|p| p.as_str()))
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(&user.verification_token)
        .bind(user.verification_token_expires_at)
        .bind(user.oauth.as_ref().map(|o| o.provider.as_str()))
        .bind(user.oauth.as_ref().map(|o| o.subject.as_str()))
        .bind(&user.profile.avatar_url)
        .bind(&user.profile.phone)
        .bind(&user.profile.company_name)
        .bind(&user.profile.company_logo_url)
        .bind(&user.profile.company_address)
        .bind(&user.profile.tax_id)
        .bind(&user.profile.website)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

impl RefreshTokenRepository for PgAuthRepository {
    async fn create(&self, token: &RefreshToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (
                token,
                user_id,
                expires_at,
                created_at,
                revoked,
                revoked_at,
                replaced_by_token,
                device_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id.as_uuid())
        .bind(token.expires_at)
        .bind(token.created_at)
        .bind(token.revoked)
        .bind(token.revoked_at)
        .bind(&token.replaced_by_token)
        .bind(&token.device_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshToken>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT
                token,
                user_id,
                expires_at,
                created_at,
                revoked,
                revoked_at,
                replaced_by_token,
                device_id
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_token()))
    }

    async fn is_valid(&self, token: &str) -> AuthResult<bool> {
        let valid = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM refresh_tokens
                WHERE token = $1 AND revoked = FALSE AND expires_at > $2
            )
            "#,
        )
        .bind(token)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(valid)
    }

    async fn detect_reuse(&self, token: &str) -> AuthResult<bool> {
        let reused = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM refresh_tokens
                WHERE token = $1 AND revoked = TRUE AND replaced_by_token IS NOT NULL
            )
            "#,
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await?;

        Ok(reused)
    }

    async fn revoke(&self, token: &str, replaced_by: Option<&str>) -> AuthResult<bool> {
        // The `revoked = FALSE` predicate makes this a compare-and-revoke:
        // of two concurrent rotations of one token, only one sees a row
        // change.
        let updated = sqlx::query(
            r#"
            UPDATE refresh_tokens SET
                revoked = TRUE,
                revoked_at = $2,
                replaced_by_token = $3
            WHERE token = $1 AND revoked = FALSE
            "#,
        )
        .bind(token)
        .bind(Utc::now())
        .bind(replaced_by)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> AuthResult<u64> {
        let revoked = sqlx::query(
            r#"
            UPDATE refresh_tokens SET
                revoked = TRUE,
                revoked_at = $2
            WHERE user_id = $1 AND revoked = FALSE
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(revoked)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        self.sweep_expired_tokens().await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

fn select_user(where_clause: &str) -> String {
    format!(
        r#"
        SELECT
            user_id,
            email,
            full_name,
            password_hash,
            is_active,
            is_verified,
            verification_token,
            verification_token_expires_at,
            oauth_provider,
            oauth_subject,
            avatar_url,
            phone,
            company_name,
            company_logo_url,
            company_address,
            tax_id,
            website,
            created_at,
            updated_at
        FROM users
        {}
        "#,
        where_clause
    )
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    full_name: Option<String>,
    password_hash: Option<String>,
    is_active: bool,
    is_verified: bool,
    verification_token: Option<String>,
    verification_token_expires_at: Option<DateTime<Utc>>,
    oauth_provider: Option<String>,
    oauth_subject: Option<String>,
    avatar_url: Option<String>,
    phone: Option<String>,
    company_name: Option<String>,
    company_logo_url: Option<String>,
    company_address: Option<String>,
    tax_id: Option<String>,
    website: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password_hash = self
            .password_hash
            .map(UserPassword::from_db)
            .transpose()
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        let oauth = match (self.oauth_provider, self.oauth_subject) {
            (Some(provider), Some(subject)) => Some(OAuthLink { provider, subject }),
            _ => None,
        };

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            full_name: self.full_name,
            password_hash,
            is_active: self.is_active,
            is_verified: self.is_verified,
            verification_token: self.verification_token,
            verification_token_expires_at: self.verification_token_expires_at,
            oauth,
            profile: UserProfile {
                avatar_url: self.avatar_url,
                phone: self.phone,
                company_name: self.company_name,
                company_logo_url: self.company_logo_url,
                company_address: self.company_address,
                tax_id: self.tax_id,
                website: self.website,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    token: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    revoked: bool,
    revoked_at: Option<DateTime<Utc>>,
    replaced_by_token: Option<String>,
    device_id: Option<String>,
}

impl RefreshTokenRow {
    fn into_token(self) -> RefreshToken {
        RefreshToken {
            token: self.token,
            user_id: UserId::from_uuid(self.user_id),
            expires_at: self.expires_at,
            created_at: self.created_at,
            revoked: self.revoked,
            revoked_at: self.revoked_at,
            replaced_by_token: self.replaced_by_token,
            device_id: self.device_id,
        }
    }
}
