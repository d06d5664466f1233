//! Email Templates
//!
//! Plain-text and HTML bodies for the account flows. Links arrive
//! fully formed from the caller; templates never touch tokens.

use crate::EmailMessage;

/// Email verification message
pub fn verification_email(to: &str, link: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Verify your email address.".to_string(),
        text: format!("Click the link to verify your email address: {link}"),
        html: format!(
            "<p>Click the link to verify your email address:</p>\
             <p><a href=\"{link}\">{link}</a></p>"
        ),
    }
}

/// Password reset message
pub fn reset_email(to: &str, link: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Reset your password.".to_string(),
        text: format!("Click the link to reset your password: {link}"),
        html: format!(
            "<p>Click the link to reset your password. \
             It will expire in 30 minutes:</p>\
             <p><a href=\"{link}\">{link}</a></p>"
        ),
    }
}

/// Magic-link sign-in message
pub fn magic_link_email(to: &str, link: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Sign in to your account.".to_string(),
        text: format!("Click the link to sign in: {link}"),
        html: format!(
            "<p>Click the link to sign in. \
             It will expire in 30 minutes:</p>\
             <p><a href=\"{link}\">{link}</a></p>"
        ),
    }
}
