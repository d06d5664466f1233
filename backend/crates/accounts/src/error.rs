//! Accounts Error Types
//!
//! This module provides account-flow error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Token failures are deliberately collapsed into one variant with one
//! uniform message: callers (and attackers) cannot distinguish
//! "expired" from "already used" from "never existed".

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Accounts-specific result type alias
pub type AccountsResult<T> = Result<T, AccountsError>;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Accounts-specific error variants
#[derive(Debug, Error)]
pub enum AccountsError {
    /// Malformed input; reported before any store access
    #[error("Invalid data provided")]
    Validation(Vec<FieldError>),

    /// Registration conflict on the unique email
    #[error("User with this email already exists.")]
    EmailTaken,

    /// No account for this email, or the account has no password
    #[error("No account found for these credentials.")]
    UserNotFound,

    /// Password verification failed
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Password was correct but the email is unverified
    #[error("Email not verified. Please check your inbox.")]
    EmailNotVerified,

    /// Token missing, expired or already used - one uniform message
    #[error("This link is invalid or has expired.")]
    InvalidOrExpiredToken,

    /// Mail dispatch failed after any store mutation already committed
    #[error("Could not send the email. Please try again later.")]
    Mail(#[from] mailer::MailerError),

    /// Store failure unrelated to input validity
    #[error("Something went wrong. Please try again later.")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountsError {
    /// Shorthand for a single-field validation failure
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        AccountsError::Validation(vec![FieldError::new(field, message)])
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountsError::Validation(_) => StatusCode::BAD_REQUEST,
            AccountsError::EmailTaken => StatusCode::CONFLICT,
            AccountsError::UserNotFound => StatusCode::NOT_FOUND,
            AccountsError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountsError::EmailNotVerified => StatusCode::FORBIDDEN,
            AccountsError::InvalidOrExpiredToken => StatusCode::GONE,
            AccountsError::Mail(_) => StatusCode::SERVICE_UNAVAILABLE,
            AccountsError::Database(_) | AccountsError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountsError::Validation(_) => ErrorKind::BadRequest,
            AccountsError::EmailTaken => ErrorKind::Conflict,
            AccountsError::UserNotFound => ErrorKind::NotFound,
            AccountsError::InvalidCredentials => ErrorKind::Unauthorized,
            AccountsError::EmailNotVerified => ErrorKind::Forbidden,
            AccountsError::InvalidOrExpiredToken => ErrorKind::Gone,
            AccountsError::Mail(_) => ErrorKind::ServiceUnavailable,
            AccountsError::Database(_) | AccountsError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountsError::Database(e) => {
                tracing::error!(error = %e, "Accounts database error");
            }
            AccountsError::Mail(e) => {
                tracing::error!(error = %e, "Mail dispatch failed");
            }
            AccountsError::Internal(msg) => {
                tracing::error!(message = %msg, "Accounts internal error");
            }
            AccountsError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AccountsError::InvalidOrExpiredToken => {
                tracing::warn!("Rejected invalid or expired token");
            }
            _ => {
                tracing::debug!(error = %self, "Accounts error");
            }
        }
    }
}

impl IntoResponse for AccountsError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            // Validation carries the field-level detail; mirror the
            // problem+json shape AppError renders, plus `errors`.
            AccountsError::Validation(errors) => {
                let detail = errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "Invalid data provided".to_string());
                let body = serde_json::json!({
                    "type": "https://httpstatuses.io/400",
                    "title": "Bad Request",
                    "status": 400,
                    "detail": detail,
                    "errors": errors,
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            other => other.to_app_error().into_response(),
        }
    }
}

impl From<AppError> for AccountsError {
    fn from(err: AppError) -> Self {
        AccountsError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AccountsError::invalid_field("email", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AccountsError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AccountsError::UserNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AccountsError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AccountsError::EmailNotVerified.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AccountsError::InvalidOrExpiredToken.status_code(),
            StatusCode::GONE
        );
    }

    #[test]
    fn test_uniform_token_message() {
        // One message for every token failure sub-condition
        assert_eq!(
            AccountsError::InvalidOrExpiredToken.to_string(),
            "This link is invalid or has expired."
        );
    }

    #[test]
    fn test_transient_errors_hide_detail() {
        let err = AccountsError::Database(sqlx::Error::PoolClosed);
        assert_eq!(
            err.to_string(),
            "Something went wrong. Please try again later."
        );
    }
}
