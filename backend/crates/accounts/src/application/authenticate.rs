//! Authenticate Use Case
//!
//! Verifies email/password credentials. Unverified accounts are
//! rejected explicitly after the password check succeeds, optionally
//! with a fresh verification link.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::validate;
use crate::domain::entity::verification_token::VerificationToken;
use crate::domain::repository::{UserRepository, VerificationTokenRepository};
use crate::domain::value_object::user_password::RawPassword;
use crate::error::{AccountsError, AccountsResult};
use mailer::{Mailer, templates};

/// Authenticate input
pub struct AuthenticateInput {
    pub email: String,
    pub password: String,
    /// When set, a rejected-unverified sign-in also resends the
    /// verification email
    pub resend_verification: bool,
}

/// Authenticated user, as returned to the session layer
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: String,
}

impl AuthenticatedUser {
    pub(crate) fn from_user(user: &crate::domain::entity::user::User) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.clone(),
            image: user.image.clone(),
            role: user.role.code().to_string(),
        }
    }
}

/// Authenticate use case
pub struct AuthenticateUseCase<U, V, M>
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

impl<U, V, M> AuthenticateUseCase<U, V, M>
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

    pub async fn execute(&self, input: AuthenticateInput) -> AccountsResult<AuthenticatedUser> {
        let email = validate::sign_in(&input.email, &input.password)?;

        // Accounts without a password hash (magic-link/OAuth only)
        // report the same way as missing accounts
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .filter(|u| u.has_password())
            .ok_or(AccountsError::UserNotFound)?;

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AccountsError::InvalidCredentials)?;

        let password_hash = user
            .password_hash
            .as_ref()
            .ok_or(AccountsError::UserNotFound)?;
        if !password_hash.verify(&raw_password) {
            return Err(AccountsError::InvalidCredentials);
        }

        // Password was correct but the email is still unverified
        if !user.is_verified() {
            if input.resend_verification {
                self.resend_verification(&user).await;
            }
            return Err(AccountsError::EmailNotVerified);
        }

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(AuthenticatedUser::from_user(&user))
    }

    /// Issue a fresh token and email it; failures are logged, the
    /// sign-in outcome stays EmailNotVerified either way
    async fn resend_verification(&self, user: &crate::domain::entity::user::User) {
        let token = VerificationToken::issue(user.email.clone(), self.config.token_ttl);

        if let Err(e) = self.verification_repo.create(&token).await {
            tracing::error!(error = %e, "Failed to store verification token on resend");
            return;
        }

        let link = self.config.verification_link(&user.email, &token.token);
        let message = templates::verification_email(user.email.as_str(), &link);
        if let Err(e) = self.mailer.send(&message).await {
            tracing::error!(error = %e, "Failed to resend verification email");
        }
    }
}
