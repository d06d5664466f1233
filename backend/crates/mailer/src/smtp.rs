//! SMTP Mailer (lettre)

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::PoolConfig;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

use crate::{EmailMessage, Mailer, MailerError};

/// SMTP transport configuration
///
/// Passed explicitly at construction; the binary assembles it from the
/// environment. Port 465 uses implicit TLS, everything else STARTTLS.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// From header, e.g. `Accounts <no-reply@example.com>`
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: "Accounts <no-reply@localhost>".to_string(),
        }
    }
}

/// SMTP-backed notification dispatcher
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the transport from configuration
    pub fn new(config: SmtpConfig) -> Result<Self, MailerError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|_| MailerError::InvalidAddress(config.from.clone()))?;

        let builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| MailerError::Config(e.to_string()))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .pool_config(PoolConfig::new().max_size(2))
            .timeout(Some(Duration::from_secs(10)))
            .build();

        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|_| MailerError::InvalidAddress(message.to.clone()))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&message.subject)
            .multipart(MultiPart::alternative_plain_html(
                message.text.clone(),
                message.html.clone(),
            ))
            .map_err(|e| MailerError::BuildFailed(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailerError::SendFailed(e.to_string()))?;

        tracing::info!(to = %message.to, subject = %message.subject, "Email dispatched");

        Ok(())
    }
}
