//! Outbound Mail Port
//!
//! Email delivery is an external collaborator; only the interface it
//! presents lives here. Production wires an SMTP-backed implementation,
//! development and tests use [`TracingMailer`].

use thiserror::Error;

/// Mail delivery errors
#[derive(Debug, Error)]
pub enum MailError {
    /// The mail transport rejected or failed the send
    #[error("Mail delivery failed: {0}")]
    DeliveryFailed(String),

    /// The transport is not configured (missing SMTP credentials)
    #[error("Mail transport not configured")]
    NotConfigured,
}

/// Port for outbound transactional email.
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Send an email-verification message containing `verification_url`.
    async fn send_verification_email(
        &self,
        to: &str,
        verification_url: &str,
        full_name: Option<&str>,
    ) -> Result<(), MailError>;
}

/// Development mailer: logs the message instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    async fn send_verification_email(
        &self,
        to: &str,
        verification_url: &str,
        full_name: Option<&str>,
    ) -> Result<(), MailError> {
        tracing::info!(
            to = %to,
            recipient_name = full_name.unwrap_or("-"),
            url = %verification_url,
            "Verification email (tracing transport, not delivered)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tracing_mailer_always_succeeds() {
        let mailer = TracingMailer;
        let result = Mailer::send_verification_email(
            &mailer,
            "user@example.com",
            "https://app.example.com/verify-email?token=abc",
            Some("Ada"),
        )
        .await;
        assert!(result.is_ok());
    }
}
