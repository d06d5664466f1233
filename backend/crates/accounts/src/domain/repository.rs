//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer. The token-consumption methods are expressed
//! as single atomic operations so implementations can enforce the
//! exactly-once guarantees with a transaction or an equivalent
//! compare-and-set.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::{
    password_reset_token::PasswordResetToken, user::User, verification_token::VerificationToken,
};
use crate::domain::value_object::{email::Email, user_password::UserPassword};
use crate::error::AccountsResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    ///
    /// The store's unique constraint on email is the authority on
    /// duplicates: concurrent registrations race here, and the loser
    /// must get `AccountsError::EmailTaken`.
    async fn create(&self, user: &User) -> AccountsResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AccountsResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AccountsResult<Option<User>>;

    /// Update user
    async fn update(&self, user: &User) -> AccountsResult<()>;
}

/// Verification token repository trait
#[trait_variant::make(VerificationTokenRepository: Send)]
pub trait LocalVerificationTokenRepository {
    /// Persist a freshly issued token
    ///
    /// Multiple live tokens per identifier may coexist; uniqueness is
    /// only on the (identifier, token) pair.
    async fn create(&self, token: &VerificationToken) -> AccountsResult<()>;

    /// Atomically delete the matching unexpired token and stamp the
    /// user's `email_verified_at`, as one unit
    ///
    /// Returns false when no matching valid token exists (missing or
    /// expired - indistinguishable to the caller).
    async fn consume_and_verify(
        &self,
        identifier: &Email,
        token: &str,
        now: DateTime<Utc>,
    ) -> AccountsResult<bool>;

    /// Atomically delete the matching unexpired token without touching
    /// any user (magic-link sign-in, where the user may not exist yet)
    ///
    /// Returns whether a valid token was taken.
    async fn take(
        &self,
        identifier: &Email,
        token: &str,
        now: DateTime<Utc>,
    ) -> AccountsResult<bool>;

    /// Remove expired rows; returns how many were deleted
    async fn delete_expired(&self, now: DateTime<Utc>) -> AccountsResult<u64>;
}

/// Password reset token repository trait
#[trait_variant::make(PasswordResetTokenRepository: Send)]
pub trait LocalPasswordResetTokenRepository {
    /// Persist a freshly issued reset record (fingerprint only)
    async fn create(&self, token: &PasswordResetToken) -> AccountsResult<()>;

    /// Atomically consume the token and update the owner's password
    ///
    /// In one transaction: compare-and-set `used_at` (iff currently
    /// null and `expires_at > now`), then write the new password hash.
    /// Returns false when the fingerprint matches no valid token. Two
    /// concurrent calls with the same token must see exactly one true.
    async fn consume(
        &self,
        token_hash: &str,
        new_password: &UserPassword,
        now: DateTime<Utc>,
    ) -> AccountsResult<bool>;

    /// Remove expired rows; returns how many were deleted
    async fn delete_expired(&self, now: DateTime<Utc>) -> AccountsResult<u64>;
}
