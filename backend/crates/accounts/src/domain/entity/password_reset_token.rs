//! Password Reset Token Entity
//!
//! Single-use authorization to change a password. Only the SHA-256
//! fingerprint of the token is ever persisted; the plaintext travels
//! once, inside the emailed link. State machine: issued -> used or
//! issued -> expired; both terminal.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{ResetTokenId, UserId};

/// Password reset token entity
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: ResetTokenId,
    /// Owning user
    pub user_id: UserId,
    /// SHA-256 hex fingerprint of the plaintext token (unique)
    pub token_hash: String,
    /// Expiry timestamp; `expires_at <= now` means expired
    pub expires_at: DateTime<Utc>,
    /// Set exactly once, atomically with the password update
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Issue a record for a freshly generated plaintext token
    ///
    /// The caller keeps the plaintext for the emailed link; this
    /// record stores only the fingerprint.
    pub fn issue(user_id: UserId, plaintext: &str, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: ResetTokenId::new(),
            user_id,
            token_hash: platform::token::fingerprint(plaintext),
            expires_at: now + ttl,
            used_at: None,
            created_at: now,
        }
    }

    /// Valid iff unused and strictly before expiry
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_stores_fingerprint_not_plaintext() {
        let plaintext = platform::token::generate();
        let record = PasswordResetToken::issue(UserId::new(), &plaintext, Duration::minutes(30));

        assert_ne!(record.token_hash, plaintext);
        assert_eq!(record.token_hash, platform::token::fingerprint(&plaintext));
        assert!(record.used_at.is_none());
    }

    #[test]
    fn test_validity() {
        let plaintext = platform::token::generate();
        let mut record =
            PasswordResetToken::issue(UserId::new(), &plaintext, Duration::minutes(30));
        let now = Utc::now();

        assert!(record.is_valid(now));

        // Boundary instant is expired
        assert!(!record.is_valid(record.expires_at));

        // Used tokens are never valid again
        record.used_at = Some(now);
        assert!(!record.is_valid(now));
    }
}
