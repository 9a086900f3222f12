//! Administrator escalation
//!
//! The escalation path never touches the Graph token, so it still works when
//! authentication is exactly what failed.

#[cfg(feature = "smtp")]
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use daybrief_core::{EscalationNotice, Escalator};
use daybrief_domain::{AdminConfig, DigestError, Result};
use tracing::warn;

#[cfg(feature = "smtp")]
pub use smtp::SmtpEscalator;

/// Stand-in used when no escalation path is configured.
#[derive(Debug, Clone, Default)]
pub struct DisabledEscalator {
    reason: String,
}

impl DisabledEscalator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl Escalator for DisabledEscalator {
    async fn escalate(&self, notice: &EscalationNotice) -> Result<()> {
        warn!(
            kind = notice.kind(),
            subject = %notice.subject(),
            reason = %self.reason,
            "escalation not sent"
        );
        Err(DigestError::Escalation("not configured".into()))
    }
}

/// SMTP escalation when admin address and SMTP settings are complete,
/// otherwise a [`DisabledEscalator`] explaining what is missing.
pub fn build_escalator(admin: &AdminConfig) -> Result<Arc<dyn Escalator>> {
    let Some(email) = admin.email.as_deref().filter(|e| !e.trim().is_empty()) else {
        return Ok(Arc::new(DisabledEscalator::new("admin.email is not set")));
    };
    let Some(smtp) = admin.smtp.as_ref().filter(|s| s.is_complete()) else {
        return Ok(Arc::new(DisabledEscalator::new("SMTP settings are incomplete")));
    };

    #[cfg(feature = "smtp")]
    {
        Ok(Arc::new(SmtpEscalator::new(smtp, email)?))
    }

    #[cfg(not(feature = "smtp"))]
    {
        let _ = (email, smtp);
        Err(DigestError::Config("built without SMTP support".into()))
    }
}
