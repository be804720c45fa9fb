//! Digest delivery over SMTP with STARTTLS.

use anyhow::{Context, Result};
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;

/// Sends the digest to the configured address, from that same address.
pub struct Mailer {
    config: MailConfig,
}

impl Mailer {
    #[must_use]
    pub const fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Build a multipart message holding a single plain-text part.
    pub fn build_message(&self, subject: &str, body: &str) -> Result<Message> {
        let mailbox: Mailbox = self
            .config
            .email_address
            .parse()
            .context("Invalid email address")?;

        Message::builder()
            .from(mailbox.clone())
            .to(mailbox)
            .subject(subject)
            .multipart(MultiPart::mixed().singlepart(SinglePart::plain(body.to_string())))
            .context("Failed to build email message")
    }

    /// Send one message. Failures are logged and reported as `false`.
    pub async fn send(&self, subject: &str, body: &str) -> bool {
        // Built per call without a pool, so the connection is closed once
        // `send` returns on every path.
        match self.transport() {
            Ok(transport) => self.deliver(&transport, subject, body).await,
            Err(e) => {
                self.report_failure(&e);
                false
            }
        }
    }

    /// Hand one message to `transport`, logging instead of propagating errors.
    pub async fn deliver<T>(&self, transport: &T, subject: &str, body: &str) -> bool
    where
        T: AsyncTransport + Sync,
        T::Error: std::error::Error + Send + Sync + 'static,
    {
        match self.try_deliver(transport, subject, body).await {
            Ok(()) => {
                tracing::info!(
                    to = %self.config.email_address,
                    subject = subject,
                    "Email sent successfully"
                );
                true
            }
            Err(e) => {
                self.report_failure(&e);
                false
            }
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let creds = Credentials::new(
            self.config.email_address.clone(),
            self.config.app_password.clone(),
        );

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
                .context("Failed to create SMTP transport")?
                .port(self.config.smtp_port)
                .timeout(Some(self.config.timeout))
                .credentials(creds)
                .build(),
        )
    }

    async fn try_deliver<T>(&self, transport: &T, subject: &str, body: &str) -> Result<()>
    where
        T: AsyncTransport + Sync,
        T::Error: std::error::Error + Send + Sync + 'static,
    {
        let email = self.build_message(subject, body)?;

        transport
            .send(email)
            .await
            .context("Failed to send email via SMTP")?;

        Ok(())
    }

    fn report_failure(&self, error: &anyhow::Error) {
        tracing::error!(
            host = %self.config.smtp_host,
            port = self.config.smtp_port,
            "Failed to send email: {:#}",
            error
        );
    }
}
