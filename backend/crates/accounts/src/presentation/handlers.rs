//! HTTP Handlers

use axum::Json;
use axum::extract::{Query, State};
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::{
    AuthenticateInput, AuthenticateUseCase, MagicLinkConsumeInput, MagicLinkRequestInput,
    MagicLinkUseCase, RegisterInput, RegisterUseCase, RequestPasswordResetInput,
    RequestPasswordResetUseCase, ResetPasswordInput, ResetPasswordUseCase, VerifyEmailInput,
    VerifyEmailUseCase,
};
use crate::domain::repository::{
    PasswordResetTokenRepository, UserRepository, VerificationTokenRepository,
};
use crate::error::AccountsResult;
use crate::presentation::dto::{
    ForgotPasswordRequest, MagicConsumeParams, MagicLinkRequest, MessageResponse, RegisterRequest,
    ResetPasswordRequest, SignInRequest, UserResponse, VerifyParams,
};
use mailer::Mailer;

/// Shared state for account handlers
pub struct AccountsAppState<R, M>
where
    R: UserRepository
        + VerificationTokenRepository
        + PasswordResetTokenRepository
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AccountsConfig>,
}

impl<R, M> Clone for AccountsAppState<R, M>
where
    R: UserRepository
        + VerificationTokenRepository
        + PasswordResetTokenRepository
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/accounts/register
pub async fn register<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<RegisterRequest>,
) -> AccountsResult<Json<MessageResponse>>
where
    R: UserRepository
        + VerificationTokenRepository
        + PasswordResetTokenRepository
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let input = RegisterInput {
        name: req.name,
        email: req.email,
        password: req.password,
        confirm: req.confirm,
    };

    use_case.execute(input).await?;

    Ok(Json(MessageResponse::ok(
        "Account created. Check your inbox to verify your email address.",
    )))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/accounts/signin
pub async fn sign_in<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<SignInRequest>,
) -> AccountsResult<Json<UserResponse>>
where
    R: UserRepository
        + VerificationTokenRepository
        + PasswordResetTokenRepository
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = AuthenticateUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let input = AuthenticateInput {
        email: req.email,
        password: req.password,
        resend_verification: req.resend_verification,
    };

    let user = use_case.execute(input).await?;

    Ok(Json(user.into()))
}

// ============================================================================
// Verify Email
// ============================================================================

/// GET /api/accounts/verify?token=..&email=..
pub async fn verify_email<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Query(params): Query<VerifyParams>,
) -> AccountsResult<Json<MessageResponse>>
where
    R: UserRepository
        + VerificationTokenRepository
        + PasswordResetTokenRepository
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = VerifyEmailUseCase::new(state.repo.clone());

    let input = VerifyEmailInput {
        token: params.token,
        email: params.email,
    };

    use_case.execute(input).await?;

    Ok(Json(MessageResponse::ok("Email verified.")))
}

// ============================================================================
// Password Reset
// ============================================================================

/// POST /api/accounts/forgot-password
///
/// Always responds with the same message, whether or not an account
/// exists for the address.
pub async fn forgot_password<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AccountsResult<Json<MessageResponse>>
where
    R: UserRepository
        + VerificationTokenRepository
        + PasswordResetTokenRepository
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = RequestPasswordResetUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case
        .execute(RequestPasswordResetInput { email: req.email })
        .await?;

    Ok(Json(MessageResponse::ok(
        "If an account exists for this address, a reset link has been sent.",
    )))
}

/// POST /api/accounts/reset-password
pub async fn reset_password<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<ResetPasswordRequest>,
) -> AccountsResult<Json<MessageResponse>>
where
    R: UserRepository
        + VerificationTokenRepository
        + PasswordResetTokenRepository
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = ResetPasswordUseCase::new(state.repo.clone());

    let input = ResetPasswordInput {
        token: req.token,
        password: req.password,
        confirm: req.confirm,
    };

    use_case.execute(input).await?;

    Ok(Json(MessageResponse::ok("Password has been reset.")))
}

// ============================================================================
// Magic Link
// ============================================================================

/// POST /api/accounts/magic/request
pub async fn magic_request<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<MagicLinkRequest>,
) -> AccountsResult<Json<MessageResponse>>
where
    R: UserRepository
        + VerificationTokenRepository
        + PasswordResetTokenRepository
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = MagicLinkUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case
        .request(MagicLinkRequestInput { email: req.email })
        .await?;

    Ok(Json(MessageResponse::ok("Sign-in link sent.")))
}

/// GET /api/accounts/magic/consume?token=..&email=..
pub async fn magic_consume<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Query(params): Query<MagicConsumeParams>,
) -> AccountsResult<Json<UserResponse>>
where
    R: UserRepository
        + VerificationTokenRepository
        + PasswordResetTokenRepository
        + Send
        + Sync
        + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = MagicLinkUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let input = MagicLinkConsumeInput {
        token: params.token,
        email: params.email,
    };

    let user = use_case.consume(input).await?;

    Ok(Json(user.into()))
}
