//! Integration tests for the account flows
//!
//! Run against the in-memory repository and recording mailer, wiring
//! the use cases exactly the way the handlers do.

use std::sync::Arc;

use chrono::{Duration, Utc};

use mailer::MemoryMailer;

use crate::application::{
    AccountsConfig, AuthenticateInput, AuthenticateUseCase, MagicLinkConsumeInput,
    MagicLinkRequestInput, MagicLinkUseCase, OAuthSignInInput, OAuthSignInUseCase, RegisterInput,
    RegisterUseCase, RequestPasswordResetInput, RequestPasswordResetUseCase, ResetPasswordInput,
    ResetPasswordUseCase, VerifyEmailInput, VerifyEmailUseCase,
};
use crate::domain::entity::password_reset_token::PasswordResetToken;
use crate::domain::entity::verification_token::VerificationToken;
use crate::domain::repository::{
    PasswordResetTokenRepository, UserRepository, VerificationTokenRepository,
};
use crate::domain::value_object::email::Email;
use crate::error::AccountsError;
use crate::infra::memory::InMemoryAccountRepository;

struct Harness {
    repo: Arc<InMemoryAccountRepository>,
    mailer: Arc<MemoryMailer>,
    config: Arc<AccountsConfig>,
}

impl Harness {
    fn new() -> Self {
        Self {
            repo: Arc::new(InMemoryAccountRepository::new()),
            mailer: Arc::new(MemoryMailer::new()),
            config: Arc::new(AccountsConfig::default()),
        }
    }

    fn register(
        &self,
    ) -> RegisterUseCase<InMemoryAccountRepository, InMemoryAccountRepository, MemoryMailer> {
        RegisterUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.mailer.clone(),
            self.config.clone(),
        )
    }

    fn authenticate(
        &self,
    ) -> AuthenticateUseCase<InMemoryAccountRepository, InMemoryAccountRepository, MemoryMailer>
    {
        AuthenticateUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.mailer.clone(),
            self.config.clone(),
        )
    }

    fn verify_email(&self) -> VerifyEmailUseCase<InMemoryAccountRepository> {
        VerifyEmailUseCase::new(self.repo.clone())
    }

    fn request_reset(
        &self,
    ) -> RequestPasswordResetUseCase<InMemoryAccountRepository, InMemoryAccountRepository, MemoryMailer>
    {
        RequestPasswordResetUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.mailer.clone(),
            self.config.clone(),
        )
    }

    fn reset_password(&self) -> ResetPasswordUseCase<InMemoryAccountRepository> {
        ResetPasswordUseCase::new(self.repo.clone())
    }

    fn magic_link(
        &self,
    ) -> MagicLinkUseCase<InMemoryAccountRepository, InMemoryAccountRepository, MemoryMailer> {
        MagicLinkUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.mailer.clone(),
            self.config.clone(),
        )
    }

    fn oauth(&self) -> OAuthSignInUseCase<InMemoryAccountRepository> {
        OAuthSignInUseCase::new(self.repo.clone())
    }

    async fn register_user(&self, email: &str, password: &str) {
        self.register()
            .execute(RegisterInput {
                name: "Anna".to_string(),
                email: email.to_string(),
                password: password.to_string(),
                confirm: password.to_string(),
            })
            .await
            .unwrap();
    }

    async fn register_verified_user(&self, email: &str, password: &str) {
        self.register_user(email, password).await;
        let token = self.stored_verification_token(email);
        self.verify_email()
            .execute(VerifyEmailInput {
                token,
                email: email.to_string(),
            })
            .await
            .unwrap();
    }

    fn stored_verification_token(&self, email: &str) -> String {
        let email = Email::new(email).unwrap();
        let tokens = self.repo.verification_tokens_for(&email);
        tokens.last().expect("verification token stored").token.clone()
    }

    /// Plaintext token from the last emailed link
    fn last_mailed_token(&self) -> String {
        let message = self.mailer.sent().last().expect("mail dispatched").clone();
        let (_, tail) = message
            .text
            .split_once("token=")
            .expect("link carries a token");
        tail.split('&').next().unwrap().to_string()
    }
}

const PASSWORD: &str = "Correct-horse-9";

// ============================================================================
// Registration and verification
// ============================================================================

mod registration {
    use super::*;

    #[tokio::test]
    async fn test_register_creates_unverified_user_and_mails_link() {
        let h = Harness::new();
        h.register_user("anna@example.com", PASSWORD).await;

        let email = Email::new("anna@example.com").unwrap();
        let user = h.repo.find_by_email(&email).await.unwrap().unwrap();
        assert!(!user.is_verified());
        assert!(user.has_password());

        let sent = h.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "anna@example.com");
        assert_eq!(sent[0].subject, "Verify your email address.");
        let token = h.stored_verification_token("anna@example.com");
        assert!(sent[0].text.contains(&token));
        assert!(sent[0].text.contains("email=anna%40example.com"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let h = Harness::new();
        h.register_user("anna@example.com", PASSWORD).await;

        let err = h
            .register()
            .execute(RegisterInput {
                name: "Other".to_string(),
                email: "anna@example.com".to_string(),
                password: PASSWORD.to_string(),
                confirm: PASSWORD.to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountsError::EmailTaken));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_store_access() {
        let h = Harness::new();
        let err = h
            .register()
            .execute(RegisterInput {
                name: String::new(),
                email: "nope".to_string(),
                password: "short".to_string(),
                confirm: "different".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            AccountsError::Validation(errors) => assert!(errors.len() >= 3),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(h.mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_mail_outage_reported_but_user_kept() {
        let h = Harness::new();
        h.mailer.set_failing(true);

        let err = h
            .register()
            .execute(RegisterInput {
                name: "Anna".to_string(),
                email: "anna@example.com".to_string(),
                password: PASSWORD.to_string(),
                confirm: PASSWORD.to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountsError::Mail(_)));

        // The account committed before the dispatch attempt
        let email = Email::new("anna@example.com").unwrap();
        assert!(h.repo.find_by_email(&email).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_verify_then_sign_in() {
        let h = Harness::new();
        h.register_verified_user("anna@example.com", PASSWORD).await;

        let user = h
            .authenticate()
            .execute(AuthenticateInput {
                email: "anna@example.com".to_string(),
                password: PASSWORD.to_string(),
                resend_verification: false,
            })
            .await
            .unwrap();
        assert_eq!(user.email, "anna@example.com");
        assert_eq!(user.role, "user");
    }

    #[tokio::test]
    async fn test_verification_token_is_single_use() {
        let h = Harness::new();
        h.register_user("anna@example.com", PASSWORD).await;
        let token = h.stored_verification_token("anna@example.com");

        let input = || VerifyEmailInput {
            token: token.clone(),
            email: "anna@example.com".to_string(),
        };
        h.verify_email().execute(input()).await.unwrap();

        let err = h.verify_email().execute(input()).await.unwrap_err();
        assert!(matches!(err, AccountsError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn test_expired_verification_token_rejected() {
        let h = Harness::new();
        h.register_user("anna@example.com", PASSWORD).await;

        let email = Email::new("anna@example.com").unwrap();
        let mut token = VerificationToken::issue(email.clone(), Duration::minutes(30));
        token.expires_at = Utc::now() - Duration::seconds(1);
        let plaintext = token.token.clone();
        VerificationTokenRepository::create(h.repo.as_ref(), &token)
            .await
            .unwrap();

        let err = h
            .verify_email()
            .execute(VerifyEmailInput {
                token: plaintext,
                email: "anna@example.com".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountsError::InvalidOrExpiredToken));
    }
}

// ============================================================================
// Sign in
// ============================================================================

mod sign_in {
    use super::*;

    #[tokio::test]
    async fn test_unknown_email_is_not_found() {
        let h = Harness::new();
        let err = h
            .authenticate()
            .execute(AuthenticateInput {
                email: "ghost@example.com".to_string(),
                password: PASSWORD.to_string(),
                resend_verification: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountsError::UserNotFound));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let h = Harness::new();
        h.register_verified_user("anna@example.com", PASSWORD).await;

        let err = h
            .authenticate()
            .execute(AuthenticateInput {
                email: "anna@example.com".to_string(),
                password: "Wrong-horse-9".to_string(),
                resend_verification: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountsError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unverified_account_rejected_explicitly() {
        let h = Harness::new();
        h.register_user("anna@example.com", PASSWORD).await;

        // Correct password, unverified email: the rejection names the
        // verification problem, not the credentials
        let err = h
            .authenticate()
            .execute(AuthenticateInput {
                email: "anna@example.com".to_string(),
                password: PASSWORD.to_string(),
                resend_verification: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountsError::EmailNotVerified));
    }

    #[tokio::test]
    async fn test_unverified_sign_in_can_resend_link() {
        let h = Harness::new();
        h.register_user("anna@example.com", PASSWORD).await;
        assert_eq!(h.mailer.sent_count(), 1);

        let err = h
            .authenticate()
            .execute(AuthenticateInput {
                email: "anna@example.com".to_string(),
                password: PASSWORD.to_string(),
                resend_verification: true,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountsError::EmailNotVerified));
        assert_eq!(h.mailer.sent_count(), 2);

        // The resent token verifies the account
        let token = h.stored_verification_token("anna@example.com");
        h.verify_email()
            .execute(VerifyEmailInput {
                token,
                email: "anna@example.com".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_passwordless_account_cannot_use_password_sign_in() {
        let h = Harness::new();
        h.oauth()
            .execute(OAuthSignInInput {
                email: "anna@example.com".to_string(),
                name: None,
                image: None,
            })
            .await
            .unwrap();

        let err = h
            .authenticate()
            .execute(AuthenticateInput {
                email: "anna@example.com".to_string(),
                password: PASSWORD.to_string(),
                resend_verification: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountsError::UserNotFound));
    }
}

// ============================================================================
// Password reset
// ============================================================================

mod password_reset {
    use super::*;

    #[tokio::test]
    async fn test_reset_round_trip() {
        let h = Harness::new();
        h.register_verified_user("anna@example.com", PASSWORD).await;

        h.request_reset()
            .execute(RequestPasswordResetInput {
                email: "anna@example.com".to_string(),
            })
            .await
            .unwrap();

        let sent = h.mailer.sent();
        assert_eq!(sent.last().unwrap().subject, "Reset your password.");
        let token = h.last_mailed_token();

        h.reset_password()
            .execute(ResetPasswordInput {
                token: token.clone(),
                password: "New-horse-10!".to_string(),
                confirm: "New-horse-10!".to_string(),
            })
            .await
            .unwrap();

        // Old password dead, new password works
        let old = h
            .authenticate()
            .execute(AuthenticateInput {
                email: "anna@example.com".to_string(),
                password: PASSWORD.to_string(),
                resend_verification: false,
            })
            .await;
        assert!(matches!(old, Err(AccountsError::InvalidCredentials)));

        h.authenticate()
            .execute(AuthenticateInput {
                email: "anna@example.com".to_string(),
                password: "New-horse-10!".to_string(),
                resend_verification: false,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reset_token_is_single_use() {
        let h = Harness::new();
        h.register_verified_user("anna@example.com", PASSWORD).await;
        h.request_reset()
            .execute(RequestPasswordResetInput {
                email: "anna@example.com".to_string(),
            })
            .await
            .unwrap();
        let token = h.last_mailed_token();

        let input = |password: &str| ResetPasswordInput {
            token: token.clone(),
            password: password.to_string(),
            confirm: password.to_string(),
        };
        h.reset_password().execute(input("New-horse-10!")).await.unwrap();

        let err = h
            .reset_password()
            .execute(input("Other-horse-11!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountsError::InvalidOrExpiredToken));

        // The failed second attempt changed nothing
        h.authenticate()
            .execute(AuthenticateInput {
                email: "anna@example.com".to_string(),
                password: "New-horse-10!".to_string(),
                resend_verification: false,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_consumption_single_winner() {
        let h = Harness::new();
        h.register_verified_user("anna@example.com", PASSWORD).await;
        h.request_reset()
            .execute(RequestPasswordResetInput {
                email: "anna@example.com".to_string(),
            })
            .await
            .unwrap();
        let token = h.last_mailed_token();

        let input = |password: &str| ResetPasswordInput {
            token: token.clone(),
            password: password.to_string(),
            confirm: password.to_string(),
        };
        let first_use_case = h.reset_password();
        let second_use_case = h.reset_password();
        let (first, second) = tokio::join!(
            first_use_case.execute(input("First-horse-10!")),
            second_use_case.execute(input("Second-horse-11!")),
        );

        // Exactly one of the two racers may win
        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
    }

    #[tokio::test]
    async fn test_unknown_address_gets_generic_success() {
        let h = Harness::new();

        h.request_reset()
            .execute(RequestPasswordResetInput {
                email: "ghost@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(h.mailer.sent_count(), 0);
        assert_eq!(h.repo.reset_token_count(), 0);
    }

    #[tokio::test]
    async fn test_expired_reset_token_rejected() {
        let h = Harness::new();
        h.register_verified_user("anna@example.com", PASSWORD).await;

        let email = Email::new("anna@example.com").unwrap();
        let user = h.repo.find_by_email(&email).await.unwrap().unwrap();

        let plaintext = platform::token::generate();
        let mut record =
            PasswordResetToken::issue(user.user_id, &plaintext, Duration::minutes(30));
        record.expires_at = Utc::now();
        PasswordResetTokenRepository::create(h.repo.as_ref(), &record)
            .await
            .unwrap();

        // The boundary instant itself already counts as expired
        let err = h
            .reset_password()
            .execute(ResetPasswordInput {
                token: plaintext,
                password: "New-horse-10!".to_string(),
                confirm: "New-horse-10!".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountsError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn test_weak_replacement_rejected_without_spending_token() {
        let h = Harness::new();
        h.register_verified_user("anna@example.com", PASSWORD).await;
        h.request_reset()
            .execute(RequestPasswordResetInput {
                email: "anna@example.com".to_string(),
            })
            .await
            .unwrap();
        let token = h.last_mailed_token();

        let err = h
            .reset_password()
            .execute(ResetPasswordInput {
                token: token.clone(),
                password: "short".to_string(),
                confirm: "short".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountsError::Validation(_)));

        // Token still alive for a valid retry
        h.reset_password()
            .execute(ResetPasswordInput {
                token,
                password: "New-horse-10!".to_string(),
                confirm: "New-horse-10!".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reset_sets_first_password_on_passwordless_account() {
        let h = Harness::new();
        h.oauth()
            .execute(OAuthSignInInput {
                email: "anna@example.com".to_string(),
                name: None,
                image: None,
            })
            .await
            .unwrap();

        h.request_reset()
            .execute(RequestPasswordResetInput {
                email: "anna@example.com".to_string(),
            })
            .await
            .unwrap();
        let token = h.last_mailed_token();

        h.reset_password()
            .execute(ResetPasswordInput {
                token,
                password: "New-horse-10!".to_string(),
                confirm: "New-horse-10!".to_string(),
            })
            .await
            .unwrap();

        h.authenticate()
            .execute(AuthenticateInput {
                email: "anna@example.com".to_string(),
                password: "New-horse-10!".to_string(),
                resend_verification: false,
            })
            .await
            .unwrap();
    }
}

// ============================================================================
// Magic link and OAuth
// ============================================================================

mod passwordless {
    use super::*;

    #[tokio::test]
    async fn test_magic_link_creates_verified_account() {
        let h = Harness::new();

        h.magic_link()
            .request(MagicLinkRequestInput {
                email: "anna@example.com".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(
            h.mailer.sent().last().unwrap().subject,
            "Sign in to your account."
        );

        let token = h.stored_verification_token("anna@example.com");
        let user = h
            .magic_link()
            .consume(MagicLinkConsumeInput {
                token,
                email: "anna@example.com".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.email, "anna@example.com");

        let email = Email::new("anna@example.com").unwrap();
        let stored = h.repo.find_by_email(&email).await.unwrap().unwrap();
        assert!(stored.is_verified());
        assert!(!stored.has_password());
    }

    #[tokio::test]
    async fn test_magic_link_is_single_use() {
        let h = Harness::new();
        h.magic_link()
            .request(MagicLinkRequestInput {
                email: "anna@example.com".to_string(),
            })
            .await
            .unwrap();
        let token = h.stored_verification_token("anna@example.com");

        let input = || MagicLinkConsumeInput {
            token: token.clone(),
            email: "anna@example.com".to_string(),
        };
        h.magic_link().consume(input()).await.unwrap();

        let err = h.magic_link().consume(input()).await.unwrap_err();
        assert!(matches!(err, AccountsError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn test_magic_link_verifies_existing_password_account() {
        let h = Harness::new();
        h.register_user("anna@example.com", PASSWORD).await;

        h.magic_link()
            .request(MagicLinkRequestInput {
                email: "anna@example.com".to_string(),
            })
            .await
            .unwrap();
        let token = h.stored_verification_token("anna@example.com");
        h.magic_link()
            .consume(MagicLinkConsumeInput {
                token,
                email: "anna@example.com".to_string(),
            })
            .await
            .unwrap();

        // The link sign-in proved the address, so the password
        // sign-in works now too
        h.authenticate()
            .execute(AuthenticateInput {
                email: "anna@example.com".to_string(),
                password: PASSWORD.to_string(),
                resend_verification: false,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_oauth_find_or_create_is_stable() {
        let h = Harness::new();

        let first = h
            .oauth()
            .execute(OAuthSignInInput {
                email: "anna@example.com".to_string(),
                name: Some("Anna".to_string()),
                image: Some("https://example.com/a.png".to_string()),
            })
            .await
            .unwrap();

        let second = h
            .oauth()
            .execute(OAuthSignInInput {
                email: "anna@example.com".to_string(),
                name: None,
                image: None,
            })
            .await
            .unwrap();

        assert_eq!(first.user_id, second.user_id);
        assert_eq!(second.name.as_deref(), Some("Anna"));
    }

    #[tokio::test]
    async fn test_oauth_settles_verification_for_password_account() {
        let h = Harness::new();
        h.register_user("anna@example.com", PASSWORD).await;

        h.oauth()
            .execute(OAuthSignInInput {
                email: "anna@example.com".to_string(),
                name: None,
                image: None,
            })
            .await
            .unwrap();

        let email = Email::new("anna@example.com").unwrap();
        let user = h.repo.find_by_email(&email).await.unwrap().unwrap();
        assert!(user.is_verified());
        assert!(user.has_password());
    }
}

// ============================================================================
// Cleanup
// ============================================================================

mod cleanup {
    use super::*;

    #[tokio::test]
    async fn test_delete_expired_leaves_live_tokens() {
        let h = Harness::new();
        let email = Email::new("anna@example.com").unwrap();

        let live = VerificationToken::issue(email.clone(), Duration::minutes(30));
        let mut dead = VerificationToken::issue(email.clone(), Duration::minutes(30));
        dead.expires_at = Utc::now() - Duration::minutes(1);
        VerificationTokenRepository::create(h.repo.as_ref(), &live)
            .await
            .unwrap();
        VerificationTokenRepository::create(h.repo.as_ref(), &dead)
            .await
            .unwrap();

        let deleted = VerificationTokenRepository::delete_expired(h.repo.as_ref(), Utc::now())
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(h.repo.verification_tokens_for(&email).len(), 1);
    }
}
