//! PostgreSQL Repository Implementations
//!
//! One pool-backed struct implementing all three repository traits.
//! The token-consumption methods run inside a transaction so the
//! consume and the user update commit or roll back together.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use kernel::id::UserId;

use crate::domain::entity::{
    password_reset_token::PasswordResetToken, user::User, verification_token::VerificationToken,
};
use crate::domain::repository::{
    PasswordResetTokenRepository, UserRepository, VerificationTokenRepository,
};
use crate::domain::value_object::{
    email::Email, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AccountsError, AccountsResult};

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove expired verification and reset tokens
    pub async fn cleanup_expired(&self) -> AccountsResult<u64> {
        let now = Utc::now();

        let verification = VerificationTokenRepository::delete_expired(self, now).await?;
        let resets = PasswordResetTokenRepository::delete_expired(self, now).await?;

        tracing::info!(
            verification_deleted = verification,
            resets_deleted = resets,
            "Cleaned up expired account tokens"
        );

        Ok(verification + resets)
    }
}

/// Map the Postgres unique-violation on users.email to EmailTaken
fn map_unique_email(err: sqlx::Error) -> AccountsError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            AccountsError::EmailTaken
        }
        _ => AccountsError::Database(err),
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAccountRepository {
    async fn create(&self, user: &User) -> AccountsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                password_hash,
                email_verified_at,
                name,
                image,
                role,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_ref().map(|p| p.as_phc_string()))
        .bind(user.email_verified_at)
        .bind(&user.name)
        .bind(&user.image)
        .bind(user.role.code())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_email)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AccountsResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                password_hash,
                email_verified_at,
                name,
                image,
                role,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AccountsResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                password_hash,
                email_verified_at,
                name,
                image,
                role,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn update(&self, user: &User) -> AccountsResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                password_hash = $3,
                email_verified_at = $4,
                name = $5,
                image = $6,
                role = $7,
                updated_at = $8
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_ref().map(|p| p.as_phc_string()))
        .bind(user.email_verified_at)
        .bind(&user.name)
        .bind(&user.image)
        .bind(user.role.code())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Verification Token Repository Implementation
// ============================================================================

impl VerificationTokenRepository for PgAccountRepository {
    async fn create(&self, token: &VerificationToken) -> AccountsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO verification_tokens (identifier, token, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token.identifier.as_str())
        .bind(&token.token)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn consume_and_verify(
        &self,
        identifier: &Email,
        token: &str,
        now: DateTime<Utc>,
    ) -> AccountsResult<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM verification_tokens
            WHERE identifier = $1 AND token = $2 AND expires_at > $3
            "#,
        )
        .bind(identifier.as_str())
        .bind(token)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        // Re-verification keeps the original timestamp
        sqlx::query(
            r#"
            UPDATE users SET
                email_verified_at = COALESCE(email_verified_at, $2),
                updated_at = $2
            WHERE email = $1
            "#,
        )
        .bind(identifier.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn take(
        &self,
        identifier: &Email,
        token: &str,
        now: DateTime<Utc>,
    ) -> AccountsResult<bool> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM verification_tokens
            WHERE identifier = $1 AND token = $2 AND expires_at > $3
            "#,
        )
        .bind(identifier.as_str())
        .bind(token)
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AccountsResult<u64> {
        let deleted = sqlx::query("DELETE FROM verification_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Password Reset Token Repository Implementation
// ============================================================================

impl PasswordResetTokenRepository for PgAccountRepository {
    async fn create(&self, token: &PasswordResetToken) -> AccountsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (
                id,
                user_id,
                token_hash,
                expires_at,
                used_at,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(token.id.as_uuid())
        .bind(token.user_id.as_uuid())
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .bind(token.used_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn consume(
        &self,
        token_hash: &str,
        new_password: &UserPassword,
        now: DateTime<Utc>,
    ) -> AccountsResult<bool> {
        let mut tx = self.pool.begin().await?;

        // The compare-and-set on used_at is the race arbiter: of two
        // concurrent calls, only one sees the row with used_at null
        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE password_reset_tokens SET used_at = $2
            WHERE token_hash = $1 AND used_at IS NULL AND expires_at > $2
            RETURNING user_id
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query(
            r#"
            UPDATE users SET
                password_hash = $2,
                updated_at = $3
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(new_password.as_phc_string())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AccountsResult<u64> {
        let deleted = sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: Option<String>,
    email_verified_at: Option<DateTime<Utc>>,
    name: Option<String>,
    image: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AccountsResult<User> {
        let password_hash = self
            .password_hash
            .map(UserPassword::from_phc_string)
            .transpose()?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            password_hash,
            email_verified_at: self.email_verified_at,
            name: self.name,
            image: self.image,
            role: UserRole::from_code(&self.role),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
