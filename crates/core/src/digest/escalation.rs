//! Admin escalation notices
//!
//! Escalation is best effort: a failed escalation is logged and dropped,
//! never retried and never escalated again.

use daybrief_domain::{DeliveryOutcome, Member};
use tracing::{error, info};

use super::ports::Escalator;

/// Everything the administrator can be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationNotice {
    /// The run could not start because configuration is incomplete.
    Configuration { detail: String },
    /// The token exchange failed.
    Authentication { detail: String },
    /// The roster could not be retrieved.
    Roster { detail: String },
    /// One member's digest was not fully delivered.
    MemberFailure {
        member_id: String,
        display_name: String,
        mail: String,
        fetch_error: Option<String>,
        failures: Vec<DeliveryOutcome>,
    },
}

impl EscalationNotice {
    pub fn member_failure(
        member: &Member,
        fetch_error: Option<String>,
        failures: Vec<DeliveryOutcome>,
    ) -> Self {
        Self::MemberFailure {
            member_id: member.id.clone(),
            display_name: member.display_name.clone(),
            mail: member.mail.clone(),
            fetch_error,
            failures,
        }
    }

    /// Short label for log fields.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Authentication { .. } => "authentication",
            Self::Roster { .. } => "roster",
            Self::MemberFailure { .. } => "member_failure",
        }
    }

    pub fn subject(&self) -> String {
        match self {
            Self::Configuration { .. } => "Daybrief configuration error".to_string(),
            Self::Authentication { .. } => "Daybrief authentication error".to_string(),
            Self::Roster { .. } => "Daybrief could not retrieve the member list".to_string(),
            Self::MemberFailure { display_name, .. } => {
                format!("Daybrief digest delivery failed for {display_name}")
            }
        }
    }

    pub fn body(&self) -> String {
        match self {
            Self::Configuration { detail } => format!(
                "The daily digest run did not start because the configuration is invalid.\n\n{detail}"
            ),
            Self::Authentication { detail } => format!(
                "Could not obtain an access token for the Microsoft Graph API. No digests were sent.\n\n{detail}"
            ),
            Self::Roster { detail } => format!(
                "Could not retrieve the member list from the Microsoft Graph API. No digests were sent.\n\n{detail}"
            ),
            Self::MemberFailure { member_id, display_name, mail, fetch_error, failures } => {
                let mut body = format!(
                    "Some reminders could not be delivered to {display_name} <{mail}> (id {member_id}).\n"
                );
                if let Some(reason) = fetch_error {
                    body.push_str(&format!("\nCalendar fetch failed: {reason}\n"));
                }
                if !failures.is_empty() {
                    body.push_str("\nFailed channels:\n");
                    for outcome in failures {
                        let detail = outcome.detail.as_deref().unwrap_or("no detail");
                        body.push_str(&format!("- {}: {detail}\n", outcome.channel));
                    }
                }
                body
            }
        }
    }
}

/// Send `notice`, logging instead of propagating a failure.
///
/// Returns whether the notice was delivered.
pub async fn escalate_best_effort(escalator: &dyn Escalator, notice: &EscalationNotice) -> bool {
    match escalator.escalate(notice).await {
        Ok(()) => {
            info!(kind = notice.kind(), "Escalation sent to administrator");
            true
        }
        Err(err) => {
            error!(kind = notice.kind(), error = %err, "Escalation failed; not retrying");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use daybrief_domain::ChannelKind;

    use super::*;

    fn member() -> Member {
        Member {
            id: "u-1".into(),
            display_name: "Ana Souza".into(),
            mail: "ana@example.com".into(),
            chat_identity: "u-1".into(),
        }
    }

    #[test]
    fn member_failure_lists_failed_channels() {
        let notice = EscalationNotice::member_failure(
            &member(),
            None,
            vec![DeliveryOutcome::failed(ChannelKind::FileDrop, "HTTP 507")],
        );

        assert_eq!(notice.subject(), "Daybrief digest delivery failed for Ana Souza");
        let body = notice.body();
        assert!(body.contains("ana@example.com"));
        assert!(body.contains("- file_drop: HTTP 507"));
        assert!(!body.contains("Calendar fetch failed"));
    }

    #[test]
    fn fetch_failure_is_described() {
        let notice =
            EscalationNotice::member_failure(&member(), Some("timed out".into()), Vec::new());
        assert!(notice.body().contains("Calendar fetch failed: timed out"));
    }

    #[test]
    fn run_level_notices_have_fixed_subjects() {
        let notice = EscalationNotice::Authentication { detail: "HTTP 401".into() };
        assert_eq!(notice.kind(), "authentication");
        assert_eq!(notice.subject(), "Daybrief authentication error");
        assert!(notice.body().ends_with("HTTP 401"));
    }
}
