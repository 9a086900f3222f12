//! One batch pass over the roster

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use daybrief_domain::{DigestError, Member, RunReport, SkippedMember};
use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use super::escalation::{escalate_best_effort, EscalationNotice};
use super::orchestrator::NotificationOrchestrator;
use super::ports::{DirectoryGateway, Escalator, TokenProvider};
use crate::schedule::window::today_in;
use crate::schedule::DayWindow;

/// Runs the digest for every member once.
pub struct BatchDriver {
    tokens: Arc<dyn TokenProvider>,
    gateway: Arc<dyn DirectoryGateway>,
    escalator: Arc<dyn Escalator>,
    orchestrator: Arc<NotificationOrchestrator>,
    max_concurrency: usize,
    date: Option<NaiveDate>,
}

impl BatchDriver {
    /// Sequential by default; see [`with_concurrency`](Self::with_concurrency).
    pub fn new(
        tokens: Arc<dyn TokenProvider>,
        gateway: Arc<dyn DirectoryGateway>,
        escalator: Arc<dyn Escalator>,
        orchestrator: Arc<NotificationOrchestrator>,
    ) -> Self {
        Self { tokens, gateway, escalator, orchestrator, max_concurrency: 1, date: None }
    }

    /// Process up to `limit` members at once. Report order then no longer
    /// follows roster order.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    /// Analyse `date` instead of today in the configured zone.
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    fn timezone(&self) -> Tz {
        self.orchestrator.analyzer().timezone()
    }

    /// Run the batch.
    ///
    /// Token and roster failures are fatal: they are escalated once, recorded
    /// in [`RunReport::fatal`] and no member is processed. Member failures are
    /// contained in their [`MemberReport`](daybrief_domain::MemberReport).
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::start();
        let tz = self.timezone();
        let date = self.date.unwrap_or_else(|| today_in(tz));
        info!(run_id = %report.run_id, %date, timezone = %tz, "Starting daily digest run");

        let day = match DayWindow::for_date(date, tz) {
            Ok(day) => day,
            Err(err) => {
                return self
                    .abort(report, err, |detail| EscalationNotice::Configuration { detail })
                    .await
            }
        };

        let token = match self.tokens.acquire_token().await {
            Ok(token) => token,
            Err(err) => {
                return self
                    .abort(report, err, |detail| EscalationNotice::Authentication { detail })
                    .await
            }
        };

        let entries = match self.gateway.list_members(&token).await {
            Ok(entries) if entries.is_empty() => {
                let err = DigestError::Data("roster is empty".to_string());
                return self.abort(report, err, |detail| EscalationNotice::Roster { detail }).await;
            }
            Ok(entries) => entries,
            Err(err) => {
                return self.abort(report, err, |detail| EscalationNotice::Roster { detail }).await
            }
        };

        let mut members = Vec::with_capacity(entries.len());
        for entry in entries {
            let entry_id = entry.id.clone();
            let name = entry.display_name.clone().unwrap_or_default();
            match Member::try_from(entry) {
                Ok(member) => members.push(member),
                Err(reason) => {
                    warn!(entry_id = entry_id.as_deref().unwrap_or("-"), %name, %reason, "Skipping roster entry");
                    report.skipped.push(SkippedMember { entry_id, reason: reason.to_string() });
                }
            }
        }
        info!(members = members.len(), skipped = report.skipped.len(), "Processing members");

        let token = &token;
        let day = &day;
        report.members = stream::iter(members)
            .map(|member| async move {
                self.orchestrator.run_digest_for_member(token, &member, day).await
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        report.finish();
        info!(
            run_id = %report.run_id,
            delivered = report.delivered(),
            failed = report.failed(),
            skipped = report.skipped.len(),
            "Daily digest run complete"
        );
        report
    }

    async fn abort(
        &self,
        mut report: RunReport,
        err: DigestError,
        notice: impl FnOnce(String) -> EscalationNotice,
    ) -> RunReport {
        error!(run_id = %report.run_id, error = %err, kind = err.label(), "Run aborted");
        escalate_best_effort(self.escalator.as_ref(), &notice(err.to_string())).await;
        report.abort(err.to_string());
        report
    }
}
