//! Reset Password Use Case
//!
//! Consumes a reset token and replaces the owner's password. The
//! token lookup and the password write are one atomic repository
//! operation; of two concurrent calls with the same token, exactly
//! one succeeds.

use std::sync::Arc;

use chrono::Utc;

use crate::application::validate;
use crate::domain::repository::PasswordResetTokenRepository;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AccountsError, AccountsResult};

/// Reset password input
pub struct ResetPasswordInput {
    pub token: String,
    pub password: String,
    pub confirm: String,
}

/// Reset password use case
pub struct ResetPasswordUseCase<P>
where
    P: PasswordResetTokenRepository,
{
    reset_repo: Arc<P>,
}

impl<P> ResetPasswordUseCase<P>
where
    P: PasswordResetTokenRepository,
{
    pub fn new(reset_repo: Arc<P>) -> Self {
        Self { reset_repo }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AccountsResult<()> {
        // Password problems are reported before the token is spent
        validate::reset_password(&input.password, &input.confirm)?;

        let raw_password = RawPassword::new(input.password)?;
        let password_hash = UserPassword::from_raw(&raw_password)?;

        let fingerprint = platform::token::fingerprint(&input.token);
        let consumed = self
            .reset_repo
            .consume(&fingerprint, &password_hash, Utc::now())
            .await?;

        if !consumed {
            return Err(AccountsError::InvalidOrExpiredToken);
        }

        tracing::info!("Password reset completed");

        Ok(())
    }
}
