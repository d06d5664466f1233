//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::AuthenticatedUser;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

// ============================================================================
// Sign In
// ============================================================================

/// Sign in request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    /// Resend the verification email when the account is unverified
    #[serde(default)]
    pub resend_verification: bool,
}

/// Authenticated user payload for the session layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: String,
}

impl From<AuthenticatedUser> for UserResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            name: user.name,
            image: user.image,
            role: user.role,
        }
    }
}

// ============================================================================
// Verification
// ============================================================================

/// Query parameters on the emailed verification link
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyParams {
    pub token: String,
    pub email: String,
}

// ============================================================================
// Password Reset
// ============================================================================

/// Forgot password request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Reset password request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    pub confirm: String,
}

// ============================================================================
// Magic Link
// ============================================================================

/// Magic link request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkRequest {
    pub email: String,
}

/// Query parameters on the emailed sign-in link
#[derive(Debug, Clone, Deserialize)]
pub struct MagicConsumeParams {
    pub token: String,
    pub email: String,
}

// ============================================================================
// Generic
// ============================================================================

/// Generic success message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
