//! Magic Link Use Case
//!
//! Passwordless sign-in: a token is mailed to the address, and
//! consuming it both authenticates and proves the email. First-time
//! addresses get an account created on consumption, already verified.

use std::sync::Arc;

use chrono::Utc;

use crate::application::authenticate::AuthenticatedUser;
use crate::application::config::AccountsConfig;
use crate::application::validate;
use crate::domain::entity::{user::User, verification_token::VerificationToken};
use crate::domain::repository::{UserRepository, VerificationTokenRepository};
use crate::error::{AccountsError, AccountsResult};
use mailer::{Mailer, templates};

/// Magic link request input
pub struct MagicLinkRequestInput {
    pub email: String,
}

/// Magic link consume input
pub struct MagicLinkConsumeInput {
    pub token: String,
    pub email: String,
}

/// Magic link use case (request + consume)
pub struct MagicLinkUseCase<U, V, M>
where
    U: UserRepository,
    V: VerificationTokenRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    verification_repo: Arc<V>,
    mailer: Arc<M>,
    config: Arc<AccountsConfig>,
}

impl<U, V, M> MagicLinkUseCase<U, V, M>
where
    U: UserRepository,
    V: VerificationTokenRepository,
    M: Mailer,
{
    pub fn new(
        user_repo: Arc<U>,
        verification_repo: Arc<V>,
        mailer: Arc<M>,
        config: Arc<AccountsConfig>,
    ) -> Self {
        Self {
            user_repo,
            verification_repo,
            mailer,
            config,
        }
    }

    /// Issue a sign-in token and mail the link
    ///
    /// Issued for any valid address, whether or not an account exists
    /// yet; the account materializes on consumption.
    pub async fn request(&self, input: MagicLinkRequestInput) -> AccountsResult<()> {
        let email = validate::email_only(&input.email)?;

        let token = VerificationToken::issue(email.clone(), self.config.token_ttl);
        self.verification_repo.create(&token).await?;

        tracing::info!(email = %email, "Magic link issued");

        let link = self.config.magic_link(&email, &token.token);
        let message = templates::magic_link_email(email.as_str(), &link);
        self.mailer.send(&message).await?;

        Ok(())
    }

    /// Consume a sign-in token and return the authenticated user
    pub async fn consume(&self, input: MagicLinkConsumeInput) -> AccountsResult<AuthenticatedUser> {
        let email = validate::email_only(&input.email)?;

        // Token is taken without touching any user row; the user may
        // not exist yet
        let taken = self
            .verification_repo
            .take(&email, &input.token, Utc::now())
            .await?;
        if !taken {
            return Err(AccountsError::InvalidOrExpiredToken);
        }

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(mut user) => {
                // The sign-in proved the address; stamp verification
                // if this account never completed it
                if !user.is_verified() {
                    user.mark_verified();
                    self.user_repo.update(&user).await?;
                }
                user
            }
            None => {
                let user = User::passwordless(email.clone(), None, None);
                self.user_repo.create(&user).await?;
                tracing::info!(user_id = %user.user_id, "Account created via magic link");
                user
            }
        };

        tracing::info!(user_id = %user.user_id, "User signed in via magic link");

        Ok(AuthenticatedUser::from_user(&user))
    }
}
