//! OAuth Sign In Use Case
//!
//! Find-or-create for identities asserted by an external provider.
//! The provider already proved the email, so accounts created or
//! touched here are verified.

use std::sync::Arc;

use crate::application::authenticate::AuthenticatedUser;
use crate::application::validate;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::AccountsResult;

/// OAuth sign in input, from the provider's profile
pub struct OAuthSignInInput {
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// OAuth sign in use case
pub struct OAuthSignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> OAuthSignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, input: OAuthSignInInput) -> AccountsResult<AuthenticatedUser> {
        let email = validate::email_only(&input.email)?;

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(mut user) => {
                // Linking a provider to an existing password account
                // also settles its verification
                let mut dirty = false;
                if !user.is_verified() {
                    user.mark_verified();
                    dirty = true;
                }
                if user.name.is_none() && input.name.is_some() {
                    user.name = input.name;
                    dirty = true;
                }
                if user.image.is_none() && input.image.is_some() {
                    user.image = input.image;
                    dirty = true;
                }
                if dirty {
                    self.user_repo.update(&user).await?;
                }
                user
            }
            None => {
                let user = User::passwordless(email, input.name, input.image);
                self.user_repo.create(&user).await?;
                tracing::info!(user_id = %user.user_id, "Account created via OAuth");
                user
            }
        };

        tracing::info!(user_id = %user.user_id, "User signed in via OAuth");

        Ok(AuthenticatedUser::from_user(&user))
    }
}
