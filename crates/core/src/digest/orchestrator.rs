//! Per-member fan-out

use std::sync::Arc;

use daybrief_domain::{ChannelKind, DeliveryOutcome, Member, MemberReport, MemberStatus};
use tracing::{info, instrument, warn};

use super::escalation::{escalate_best_effort, EscalationNotice};
use super::ports::{AccessToken, DeliveryChannel, DirectoryGateway, Escalator};
use super::Digest;
use crate::schedule::{DayWindow, ScheduleAnalyzer};

/// Drives one member's digest from event fetch to escalation.
pub struct NotificationOrchestrator {
    gateway: Arc<dyn DirectoryGateway>,
    escalator: Arc<dyn Escalator>,
    channels: Vec<Arc<dyn DeliveryChannel>>,
    analyzer: ScheduleAnalyzer,
}

impl NotificationOrchestrator {
    /// Create an orchestrator with no channels.
    pub fn new(
        gateway: Arc<dyn DirectoryGateway>,
        escalator: Arc<dyn Escalator>,
        analyzer: ScheduleAnalyzer,
    ) -> Self {
        Self { gateway, escalator, channels: Vec::new(), analyzer }
    }

    /// Add a channel. Channels are attempted in the order they were added.
    pub fn with_channel(mut self, channel: Arc<dyn DeliveryChannel>) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn with_channels(mut self, channels: impl IntoIterator<Item = Arc<dyn DeliveryChannel>>) -> Self {
        self.channels.extend(channels);
        self
    }

    pub fn channel_kinds(&self) -> Vec<ChannelKind> {
        self.channels.iter().map(|channel| channel.kind()).collect()
    }

    pub const fn analyzer(&self) -> &ScheduleAnalyzer {
        &self.analyzer
    }

    /// Fetch, analyse, deliver on every channel and escalate once if anything
    /// failed.
    ///
    /// Never returns an error: every failure ends up in the report. When the
    /// events cannot be fetched no channel is attempted and every channel is
    /// recorded as failed.
    #[instrument(skip_all, fields(member_id = %member.id))]
    pub async fn run_digest_for_member(
        &self,
        token: &AccessToken,
        member: &Member,
        day: &DayWindow,
    ) -> MemberReport {
        let mut report = MemberReport {
            member_id: member.id.clone(),
            display_name: member.display_name.clone(),
            outcomes: Vec::with_capacity(self.channels.len()),
            conflicts: 0,
            focus_blocks: 0,
            fetch_error: None,
            escalated: false,
        };

        match self.gateway.events_for_day(token, member, day).await {
            Ok(events) => {
                let analysis = self.analyzer.analyze(&events, day.date);
                report.conflicts = analysis.conflicts.len();
                report.focus_blocks = analysis.focus_blocks.len();
                if report.conflicts > 0 {
                    info!(conflicts = report.conflicts, "Schedule conflicts detected");
                }
                if report.focus_blocks > 0 {
                    info!(focus_blocks = report.focus_blocks, "Focus blocks suggested");
                }

                let digest = Digest::new(member.clone(), day, events, analysis);
                for channel in &self.channels {
                    let outcome = channel.deliver(token, &digest).await;
                    if !outcome.success {
                        warn!(
                            channel = %outcome.channel,
                            detail = outcome.detail.as_deref().unwrap_or_default(),
                            "Channel delivery failed"
                        );
                    }
                    report.outcomes.push(outcome);
                }
            }
            Err(err) => {
                warn!(error = %err, "Could not fetch events; skipping delivery");
                let detail = format!("events unavailable: {err}");
                report.outcomes = self
                    .channels
                    .iter()
                    .map(|channel| DeliveryOutcome::failed(channel.kind(), detail.clone()))
                    .collect();
                report.fetch_error = Some(err.to_string());
            }
        }

        let status = report.status();
        if status == MemberStatus::Delivered {
            info!(status = %status, "Digest delivered");
        } else {
            warn!(status = %status, failed = report.failures().count(), "Digest not fully delivered");
            let notice = EscalationNotice::member_failure(
                member,
                report.fetch_error.clone(),
                report.failures().cloned().collect(),
            );
            report.escalated = escalate_best_effort(self.escalator.as_ref(), &notice).await;
        }

        report
    }
}
