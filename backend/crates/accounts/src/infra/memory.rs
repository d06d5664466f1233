//! In-Memory Repository Implementation
//!
//! Single-mutex store for tests. Holding one lock across each whole
//! operation gives the same atomicity the Postgres transactions do:
//! the consume methods observe and mutate state in one critical
//! section, so two concurrent consumers of the same token still see
//! exactly one success.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use kernel::id::UserId;

use crate::domain::entity::{
    password_reset_token::PasswordResetToken, user::User, verification_token::VerificationToken,
};
use crate::domain::repository::{
    PasswordResetTokenRepository, UserRepository, VerificationTokenRepository,
};
use crate::domain::value_object::{email::Email, user_password::UserPassword};
use crate::error::{AccountsError, AccountsResult};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    verification: Vec<VerificationToken>,
    resets: Vec<PasswordResetToken>,
}

/// In-memory account repository
#[derive(Default)]
pub struct InMemoryAccountRepository {
    // No await happens while the lock is held
    state: Mutex<State>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live verification tokens for an identifier (test inspection)
    pub fn verification_tokens_for(&self, email: &Email) -> Vec<VerificationToken> {
        let state = self.state.lock().unwrap();
        state
            .verification
            .iter()
            .filter(|t| t.identifier.as_str() == email.as_str())
            .cloned()
            .collect()
    }

    /// Number of stored reset records (test inspection)
    pub fn reset_token_count(&self) -> usize {
        self.state.lock().unwrap().resets.len()
    }
}

impl UserRepository for InMemoryAccountRepository {
    async fn create(&self, user: &User) -> AccountsResult<()> {
        let mut state = self.state.lock().unwrap();

        if state
            .users
            .values()
            .any(|u| u.email.as_str() == user.email.as_str())
        {
            return Err(AccountsError::EmailTaken);
        }

        state.users.insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AccountsResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.get(user_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AccountsResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .values()
            .find(|u| u.email.as_str() == email.as_str())
            .cloned())
    }

    async fn update(&self, user: &User) -> AccountsResult<()> {
        let mut state = self.state.lock().unwrap();
        state.users.insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }
}

impl VerificationTokenRepository for InMemoryAccountRepository {
    async fn create(&self, token: &VerificationToken) -> AccountsResult<()> {
        let mut state = self.state.lock().unwrap();
        state.verification.push(token.clone());
        Ok(())
    }

    async fn consume_and_verify(
        &self,
        identifier: &Email,
        token: &str,
        now: DateTime<Utc>,
    ) -> AccountsResult<bool> {
        let mut state = self.state.lock().unwrap();

        let position = state.verification.iter().position(|t| {
            t.identifier.as_str() == identifier.as_str()
                && t.token == token
                && !t.is_expired(now)
        });
        let Some(position) = position else {
            return Ok(false);
        };
        state.verification.remove(position);

        if let Some(user) = state
            .users
            .values_mut()
            .find(|u| u.email.as_str() == identifier.as_str())
        {
            if user.email_verified_at.is_none() {
                user.email_verified_at = Some(now);
            }
            user.updated_at = now;
        }

        Ok(true)
    }

    async fn take(
        &self,
        identifier: &Email,
        token: &str,
        now: DateTime<Utc>,
    ) -> AccountsResult<bool> {
        let mut state = self.state.lock().unwrap();

        let position = state.verification.iter().position(|t| {
            t.identifier.as_str() == identifier.as_str()
                && t.token == token
                && !t.is_expired(now)
        });
        match position {
            Some(position) => {
                state.verification.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AccountsResult<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.verification.len();
        state.verification.retain(|t| !t.is_expired(now));
        Ok((before - state.verification.len()) as u64)
    }
}

impl PasswordResetTokenRepository for InMemoryAccountRepository {
    async fn create(&self, token: &PasswordResetToken) -> AccountsResult<()> {
        let mut state = self.state.lock().unwrap();
        state.resets.push(token.clone());
        Ok(())
    }

    async fn consume(
        &self,
        token_hash: &str,
        new_password: &UserPassword,
        now: DateTime<Utc>,
    ) -> AccountsResult<bool> {
        let mut state = self.state.lock().unwrap();

        let record = state
            .resets
            .iter_mut()
            .find(|t| t.token_hash == token_hash && t.is_valid(now));
        let Some(record) = record else {
            return Ok(false);
        };
        record.used_at = Some(now);
        let user_id = record.user_id;

        if let Some(user) = state.users.get_mut(user_id.as_uuid()) {
            user.password_hash = Some(new_password.clone());
            user.updated_at = now;
        }

        Ok(true)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AccountsResult<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.resets.len();
        state.resets.retain(|t| t.expires_at > now);
        Ok((before - state.resets.len()) as u64)
    }
}
