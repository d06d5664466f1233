//! Verification Token Entity
//!
//! Single-use, time-limited proof of control of an email address.
//! Keyed by (identifier, token); multiple live tokens may coexist for
//! one identifier. State machine: issued -> consumed (deleted) or
//! issued -> expired; both terminal.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::email::Email;

/// Verification token entity
///
/// The token is stored in plaintext; it authorizes nothing beyond the
/// one-time verification of its identifier and is deleted on use.
#[derive(Debug, Clone)]
pub struct VerificationToken {
    /// The email address this token verifies
    pub identifier: Email,
    /// Opaque random token (hex, URL-safe)
    pub token: String,
    /// Expiry timestamp; `expires_at <= now` means expired
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Issue a fresh token for an identifier
    pub fn issue(identifier: Email, ttl: Duration) -> Self {
        Self {
            identifier,
            token: platform::token::generate(),
            expires_at: Utc::now() + ttl,
        }
    }

    /// Expiry check; the boundary instant itself counts as expired
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_generates_distinct_tokens() {
        let email = Email::new("a@b.com").unwrap();
        let first = VerificationToken::issue(email.clone(), Duration::minutes(30));
        let second = VerificationToken::issue(email, Duration::minutes(30));
        assert_ne!(first.token, second.token);
        assert_eq!(first.token.len(), platform::token::TOKEN_HEX_LENGTH);
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        let email = Email::new("a@b.com").unwrap();
        let token = VerificationToken::issue(email, Duration::minutes(30));

        assert!(!token.is_expired(token.expires_at - Duration::seconds(1)));
        assert!(token.is_expired(token.expires_at));
        assert!(token.is_expired(token.expires_at + Duration::seconds(1)));
    }
}
