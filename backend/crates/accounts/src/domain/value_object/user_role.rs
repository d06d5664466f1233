use serde::{Deserialize, Serialize};
use std::fmt;

/// User role, assigned at registration and carried into sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Parse a stored role code; unknown codes fall back to `User`
    #[inline]
    pub fn from_code(code: &str) -> Self {
        match code {
            "user" => UserRole::User,
            "admin" => UserRole::Admin,
            _ => {
                tracing::error!(code = %code, "Unknown UserRole code, defaulting to user");
                UserRole::User
            }
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
