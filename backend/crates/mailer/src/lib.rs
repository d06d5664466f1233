//! Mailer Crate - Notification Dispatch
//!
//! Outbound email for the account flows (verification links, magic
//! links, password reset links). The dispatcher is an explicit
//! dependency injected into use cases at construction - there is no
//! process-wide transporter singleton.
//!
//! Implementations:
//! - [`smtp::SmtpMailer`] - production SMTP transport (lettre)
//! - [`memory::MemoryMailer`] - in-memory recorder for tests and dev

use thiserror::Error;

pub mod memory;
pub mod smtp;
pub mod templates;

pub use memory::MemoryMailer;
pub use smtp::{SmtpConfig, SmtpMailer};

/// A fully-formed outbound message
///
/// The caller constructs subject, plain-text and HTML bodies; the
/// mailer only transports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Mail dispatch errors
///
/// Dispatch failures are transient from the caller's perspective: a
/// committed user/token mutation is never rolled back because the
/// message could not be sent.
#[derive(Debug, Error)]
pub enum MailerError {
    /// Address could not be parsed
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Message could not be assembled
    #[error("Failed to build email: {0}")]
    BuildFailed(String),

    /// Transport-level failure (connection, auth, relay rejection)
    #[error("Failed to send email: {0}")]
    SendFailed(String),

    /// Transport could not be constructed from configuration
    #[error("Invalid mailer configuration: {0}")]
    Config(String),
}

/// Notification dispatcher trait
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Deliver a single message
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError>;
}
