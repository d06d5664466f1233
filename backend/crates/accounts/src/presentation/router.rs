//! Accounts Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::repository::{
    PasswordResetTokenRepository, UserRepository, VerificationTokenRepository,
};
use crate::infra::postgres::PgAccountRepository;
use crate::presentation::handlers::{self, AccountsAppState};
use mailer::{Mailer, SmtpMailer};

/// Create the accounts router with the PostgreSQL repository and SMTP
/// mailer
pub fn accounts_router(
    repo: PgAccountRepository,
    mailer: SmtpMailer,
    config: AccountsConfig,
) -> Router {
    accounts_router_generic(repo, mailer, config)
}

/// Create a generic accounts router for any repository and mailer
/// implementation
pub fn accounts_router_generic<R, M>(repo: R, mailer: M, config: AccountsConfig) -> Router
where
    R: UserRepository
        + VerificationTokenRepository
        + PasswordResetTokenRepository
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let state = AccountsAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };

    Router::new()
        .route("/register", post(handlers::register::<R, M>))
        .route("/signin", post(handlers::sign_in::<R, M>))
        .route("/verify", get(handlers::verify_email::<R, M>))
        .route("/forgot-password", post(handlers::forgot_password::<R, M>))
        .route("/reset-password", post(handlers::reset_password::<R, M>))
        .route("/magic/request", post(handlers::magic_request::<R, M>))
        .route("/magic/consume", get(handlers::magic_consume::<R, M>))
        .with_state(state)
}
