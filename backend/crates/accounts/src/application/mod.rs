//! Application Layer
//!
//! Use cases orchestrating the account flows over the repository and
//! mailer traits.

pub mod authenticate;
pub mod config;
pub mod magic_link;
pub mod oauth_sign_in;
pub mod register;
pub mod request_password_reset;
pub mod reset_password;
pub mod validate;
pub mod verify_email;

pub use authenticate::{AuthenticateInput, AuthenticateUseCase, AuthenticatedUser};
pub use config::AccountsConfig;
pub use magic_link::{MagicLinkConsumeInput, MagicLinkRequestInput, MagicLinkUseCase};
pub use oauth_sign_in::{OAuthSignInInput, OAuthSignInUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use request_password_reset::{RequestPasswordResetInput, RequestPasswordResetUseCase};
pub use reset_password::{ResetPasswordInput, ResetPasswordUseCase};
pub use verify_email::{VerifyEmailInput, VerifyEmailUseCase};
