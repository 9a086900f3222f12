//! Escalation mail over SMTP with STARTTLS.

use std::time::Duration;

use async_trait::async_trait;
use daybrief_core::{EscalationNotice, Escalator};
use daybrief_domain::{DigestError, Result, SmtpSettings};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

/// Sends notices straight to the administrator, without the Graph token.
pub struct SmtpEscalator {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl std::fmt::Debug for SmtpEscalator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpEscalator").field("from", &self.from).field("to", &self.to).finish()
    }
}

impl SmtpEscalator {
    pub fn new(settings: &SmtpSettings, admin_email: &str) -> Result<Self> {
        if !settings.is_complete() {
            return Err(DigestError::Config("SMTP host, username and password are required".into()));
        }

        let from = parse_mailbox(settings.from_address(), "smtp.from")?;
        let to = parse_mailbox(admin_email, "admin.email")?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|err| DigestError::Config(format!("invalid SMTP relay {}: {err}", settings.host)))?
            .port(settings.port)
            .credentials(Credentials::new(settings.username.clone(), settings.password.clone()))
            .timeout(Some(Duration::from_secs(settings.timeout_secs)))
            .build();

        Ok(Self { transport, from, to })
    }

    pub fn message(&self, notice: &EscalationNotice) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(notice.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(notice.body())
            .map_err(|err| DigestError::Escalation(format!("could not build message: {err}")))
    }
}

fn parse_mailbox(address: &str, field: &str) -> Result<Mailbox> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|err| DigestError::Config(format!("{field} '{address}' is not a mail address: {err}")))
}

#[async_trait]
impl Escalator for SmtpEscalator {
    #[instrument(skip_all, fields(kind = notice.kind()))]
    async fn escalate(&self, notice: &EscalationNotice) -> Result<()> {
        let message = self.message(notice)?;
        self.transport
            .send(message)
            .await
            .map_err(|err| DigestError::Escalation(format!("SMTP delivery failed: {err}")))?;
        info!(to = %self.to, "escalation mail sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".into(),
            username: "robot@example.com".into(),
            password: "hunter2".into(),
            ..SmtpSettings::default()
        }
    }

    #[tokio::test]
    async fn builds_plain_text_notice() {
        let escalator = SmtpEscalator::new(&settings(), "admin@example.com").unwrap();
        let notice = EscalationNotice::Roster { detail: "HTTP 503".into() };

        let message = escalator.message(&notice).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("From: robot@example.com"));
        assert!(raw.contains("To: admin@example.com"));
        assert!(raw.contains("Content-Type: text/plain"));
        assert!(raw.contains(&notice.subject()));
    }

    #[tokio::test]
    async fn incomplete_settings_are_rejected() {
        let mut incomplete = settings();
        incomplete.password.clear();
        assert!(matches!(
            SmtpEscalator::new(&incomplete, "admin@example.com"),
            Err(DigestError::Config(_))
        ));
    }

    #[tokio::test]
    async fn debug_hides_credentials() {
        let escalator = SmtpEscalator::new(&settings(), "admin@example.com").unwrap();
        assert!(!format!("{escalator:?}").contains("hunter2"));
    }
}
