//! Request Password Reset Use Case
//!
//! Issues a single-use reset token and emails the link. The response
//! never reveals whether an account exists for the address.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::validate;
use crate::domain::entity::password_reset_token::PasswordResetToken;
use crate::domain::repository::{PasswordResetTokenRepository, UserRepository};
use crate::error::AccountsResult;
use mailer::{Mailer, templates};

/// Request password reset input
pub struct RequestPasswordResetInput {
    pub email: String,
}

/// Request password reset use case
pub struct RequestPasswordResetUseCase<U, P, M>
where
    U: UserRepository,
    P: PasswordResetTokenRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    reset_repo: Arc<P>,
    mailer: Arc<M>,
    config: Arc<AccountsConfig>,
}

impl<U, P, M> RequestPasswordResetUseCase<U, P, M>
where
    U: UserRepository,
    P: PasswordResetTokenRepository,
    M: Mailer,
{
    pub fn new(
        user_repo: Arc<U>,
        reset_repo: Arc<P>,
        mailer: Arc<M>,
        config: Arc<AccountsConfig>,
    ) -> Self {
        Self {
            user_repo,
            reset_repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, input: RequestPasswordResetInput) -> AccountsResult<()> {
        let email = validate::email_only(&input.email)?;

        // Unknown addresses get the same success response, with no
        // record written and no mail sent
        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown address");
            return Ok(());
        };

        // Only the fingerprint is stored; the plaintext lives in the
        // emailed link and nowhere else
        let plaintext = platform::token::generate();
        let record = PasswordResetToken::issue(user.user_id, &plaintext, self.config.token_ttl);
        self.reset_repo.create(&record).await?;

        tracing::info!(user_id = %user.user_id, "Password reset token issued");

        let link = self.config.reset_link(&plaintext);
        let message = templates::reset_email(email.as_str(), &link);
        self.mailer.send(&message).await?;

        Ok(())
    }
}
