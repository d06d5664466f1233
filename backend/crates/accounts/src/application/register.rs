//! Register Use Case
//!
//! Creates a new unverified account with a password and emails a
//! verification link.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::validate;
use crate::domain::entity::{user::User, verification_token::VerificationToken};
use crate::domain::repository::{UserRepository, VerificationTokenRepository};
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::AccountsResult;
use mailer::{Mailer, templates};

/// Register input
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub email: String,
}

/// Register use case
pub struct RegisterUseCase<U, V, M>
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

impl<U, V, M> RegisterUseCase<U, V, M>
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

    pub async fn execute(&self, input: RegisterInput) -> AccountsResult<RegisterOutput> {
        // Validate all fields before any store access
        let email = validate::registration(
            &input.name,
            &input.email,
            &input.password,
            &input.confirm,
        )?;

        // Hash the password
        let raw_password = RawPassword::new(input.password)?;
        let password_hash = UserPassword::from_raw(&raw_password)?;

        // Create the user; the store's unique constraint on email is
        // the authority on duplicates
        let user = User::register(email.clone(), password_hash, Some(input.name.trim().to_string()));
        self.user_repo.create(&user).await?;

        // Issue and persist a verification token
        let token = VerificationToken::issue(email.clone(), self.config.token_ttl);
        self.verification_repo.create(&token).await?;

        tracing::info!(
            user_id = %user.user_id,
            email = %user.email,
            "User registered"
        );

        // Mail dispatch happens after the account committed. A failure
        // here surfaces as a distinct error; the account stays created
        // and a later sign-in attempt can resend the link.
        let link = self.config.verification_link(&email, &token.token);
        let message = templates::verification_email(email.as_str(), &link);
        self.mailer.send(&message).await?;

        Ok(RegisterOutput {
            email: email.as_str().to_string(),
        })
    }
}
