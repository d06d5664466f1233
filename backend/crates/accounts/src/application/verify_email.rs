//! Verify Email Use Case
//!
//! Consumes a verification token and stamps the account verified, as
//! one atomic unit in the repository.

use std::sync::Arc;

use chrono::Utc;

use crate::application::validate;
use crate::domain::repository::VerificationTokenRepository;
use crate::error::{AccountsError, AccountsResult};

/// Verify email input
pub struct VerifyEmailInput {
    pub token: String,
    pub email: String,
}

/// Verify email use case
pub struct VerifyEmailUseCase<V>
where
    V: VerificationTokenRepository,
{
    verification_repo: Arc<V>,
}

impl<V> VerifyEmailUseCase<V>
where
    V: VerificationTokenRepository,
{
    pub fn new(verification_repo: Arc<V>) -> Self {
        Self { verification_repo }
    }

    pub async fn execute(&self, input: VerifyEmailInput) -> AccountsResult<()> {
        let email = validate::email_only(&input.email)?;

        let verified = self
            .verification_repo
            .consume_and_verify(&email, &input.token, Utc::now())
            .await?;

        if !verified {
            // Missing, expired and already-used all collapse into the
            // same outcome
            return Err(AccountsError::InvalidOrExpiredToken);
        }

        tracing::info!(email = %email, "Email verified");

        Ok(())
    }
}
