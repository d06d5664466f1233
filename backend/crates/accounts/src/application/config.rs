//! Application Configuration
//!
//! Configuration for the accounts application layer. Passed as an
//! explicit struct into use cases; nothing here is process-global.

use chrono::Duration;
use url::Url;

use crate::domain::value_object::email::Email;

/// Accounts application configuration
#[derive(Debug, Clone)]
pub struct AccountsConfig {
    /// Public base URL links are built against
    pub base_url: Url,
    /// Lifetime of verification, magic-link and reset tokens (30 min)
    pub token_ttl: Duration,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            // Safe to unwrap: literal is a valid URL
            base_url: Url::parse("http://localhost:3000").expect("valid literal URL"),
            token_ttl: Duration::minutes(30),
        }
    }
}

impl AccountsConfig {
    /// Create config for a given public base URL
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Default::default()
        }
    }

    /// `<base>/verify?token=..&email=..` (query values URL-encoded)
    pub fn verification_link(&self, email: &Email, token: &str) -> String {
        let mut url = self.base_url.clone();
        url.set_path("/verify");
        url.query_pairs_mut()
            .append_pair("token", token)
            .append_pair("email", email.as_str());
        url.to_string()
    }

    /// `<base>/forgot-password/get?token=..`
    pub fn reset_link(&self, token: &str) -> String {
        let mut url = self.base_url.clone();
        url.set_path("/forgot-password/get");
        url.query_pairs_mut().append_pair("token", token);
        url.to_string()
    }

    /// `<base>/signin/magic?token=..&email=..`
    pub fn magic_link(&self, email: &Email, token: &str) -> String {
        let mut url = self.base_url.clone();
        url.set_path("/signin/magic");
        url.query_pairs_mut()
            .append_pair("token", token)
            .append_pair("email", email.as_str());
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_link_encodes_email() {
        let config = AccountsConfig::default();
        let email = Email::new("a+tag@b.com").unwrap();
        let link = config.verification_link(&email, "abc123");

        assert!(link.starts_with("http://localhost:3000/verify?"));
        assert!(link.contains("token=abc123"));
        // '+' and '@' must not appear raw in the query value
        assert!(link.contains("email=a%2Btag%40b.com"));
    }

    #[test]
    fn test_reset_link_shape() {
        let config = AccountsConfig::default();
        assert_eq!(
            config.reset_link("abc123"),
            "http://localhost:3000/forgot-password/get?token=abc123"
        );
    }

    #[test]
    fn test_magic_link_shape() {
        let config = AccountsConfig::default();
        let email = Email::new("a@b.com").unwrap();
        let link = config.magic_link(&email, "t");
        assert!(link.starts_with("http://localhost:3000/signin/magic?"));
        assert!(link.contains("email=a%40b.com"));
    }
}
