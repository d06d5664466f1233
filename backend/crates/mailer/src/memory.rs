//! In-Memory Mailer
//!
//! Records every message instead of delivering it. Used by tests to
//! assert on dispatched links, and by local development when no SMTP
//! credentials are configured.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{EmailMessage, Mailer, MailerError};

/// Recording notification dispatcher
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<EmailMessage>>,
    failing: AtomicBool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded message, in dispatch order
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }

    /// Number of recorded messages
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer lock poisoned").len()
    }

    /// Make subsequent sends fail (simulates transport outage)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Mailer for MemoryMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailerError::SendFailed("simulated outage".to_string()));
        }

        tracing::debug!(to = %message.to, subject = %message.subject, "Email recorded");

        self.sent
            .lock()
            .expect("mailer lock poisoned")
            .push(message.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to: "a@b.com".to_string(),
            subject: "Hello".to_string(),
            text: "body".to_string(),
            html: "<p>body</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_messages_in_order() {
        let mailer = MemoryMailer::new();
        mailer.send(&message()).await.unwrap();

        let mut second = message();
        second.subject = "Second".to_string();
        mailer.send(&second).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].subject, "Hello");
        assert_eq!(sent[1].subject, "Second");
    }

    #[tokio::test]
    async fn test_failing_mode() {
        let mailer = MemoryMailer::new();
        mailer.set_failing(true);
        assert!(mailer.send(&message()).await.is_err());
        assert_eq!(mailer.sent_count(), 0);

        mailer.set_failing(false);
        assert!(mailer.send(&message()).await.is_ok());
        assert_eq!(mailer.sent_count(), 1);
    }
}
