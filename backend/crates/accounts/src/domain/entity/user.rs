//! User Entity
//!
//! Core account entity. A user is created either through registration
//! (with a password, unverified) or through a first magic-link/OAuth
//! sign-in (passwordless, verified). Never deleted by this subsystem.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, user_password::UserPassword, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Email address (unique, lowercased)
    pub email: Email,
    /// Password hash; `None` for magic-link/OAuth-only accounts
    pub password_hash: Option<UserPassword>,
    /// When the email was proven; `None` means unverified
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Display name
    pub name: Option<String>,
    /// Avatar URL
    pub image: Option<String>,
    /// Role (User, Admin)
    pub role: UserRole,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user from registration (unverified, with password)
    pub fn register(email: Email, password_hash: UserPassword, name: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            password_hash: Some(password_hash),
            email_verified_at: None,
            name,
            image: None,
            role: UserRole::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new user from a first magic-link or OAuth sign-in
    ///
    /// The sign-in itself proved control of the email, so the account
    /// starts verified and has no password.
    pub fn passwordless(email: Email, name: Option<String>, image: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            password_hash: None,
            email_verified_at: Some(now),
            name,
            image,
            role: UserRole::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the email has been verified
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Whether the account can authenticate with a password
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Mark the email as verified
    ///
    /// Re-verification keeps the original timestamp; it re-confirms,
    /// it is not an error.
    pub fn mark_verified(&mut self) {
        let now = Utc::now();
        if self.email_verified_at.is_none() {
            self.email_verified_at = Some(now);
        }
        self.updated_at = now;
    }

    /// Replace the password hash (reset flow, or first password for a
    /// previously passwordless account)
    pub fn set_password(&mut self, password_hash: UserPassword) {
        self.password_hash = Some(password_hash);
        self.updated_at = Utc::now();
    }
}
