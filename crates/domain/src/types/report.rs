//! Delivery outcomes and run reports
//!
//! Everything here is run-scoped: built while the batch executes, logged at
//! the end, then dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::impl_keyword_conversions;

/// Independent notification delivery mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Email,
    Chat,
    FileDrop,
}

impl_keyword_conversions!(ChannelKind {
    Email => "email",
    Chat => "chat",
    FileDrop => "file_drop",
});

impl ChannelKind {
    pub const ALL: [Self; 3] = [Self::Email, Self::Chat, Self::FileDrop];
}

/// Result of one channel delivery for one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub channel: ChannelKind,
    pub success: bool,
    pub detail: Option<String>,
}

impl DeliveryOutcome {
    pub const fn delivered(channel: ChannelKind) -> Self {
        Self { channel, success: true, detail: None }
    }

    pub fn failed(channel: ChannelKind, detail: impl Into<String>) -> Self {
        Self { channel, success: false, detail: Some(detail.into()) }
    }
}

/// Aggregate state of one member's digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// Every attempted channel succeeded.
    Delivered,
    /// At least one channel succeeded and at least one failed.
    PartiallyFailed,
    /// No channel succeeded.
    Failed,
}

impl_keyword_conversions!(MemberStatus {
    Delivered => "delivered",
    PartiallyFailed => "partially_failed",
    Failed => "failed",
});

/// Everything the run learned about one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberReport {
    pub member_id: String,
    pub display_name: String,
    pub outcomes: Vec<DeliveryOutcome>,
    pub conflicts: usize,
    pub focus_blocks: usize,
    /// Set when the member's events could not be fetched at all.
    pub fetch_error: Option<String>,
    pub escalated: bool,
}

impl MemberReport {
    pub fn status(&self) -> MemberStatus {
        let succeeded = self.outcomes.iter().filter(|o| o.success).count();
        if self.fetch_error.is_none() && succeeded == self.outcomes.len() {
            MemberStatus::Delivered
        } else if succeeded > 0 {
            MemberStatus::PartiallyFailed
        } else {
            MemberStatus::Failed
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == MemberStatus::Delivered
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeliveryOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }
}

/// A roster entry that was not processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedMember {
    pub entry_id: Option<String>,
    pub reason: String,
}

/// Summary of one batch pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub members: Vec<MemberReport>,
    pub skipped: Vec<SkippedMember>,
    /// Reason the run stopped before processing members, if it did.
    pub fatal: Option<String>,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            run_id: Uuid::now_v7(),
            started_at: Utc::now(),
            finished_at: None,
            members: Vec::new(),
            skipped: Vec::new(),
            fatal: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn abort(&mut self, reason: impl Into<String>) {
        self.fatal = Some(reason.into());
        self.finish();
    }

    pub fn delivered(&self) -> usize {
        self.members.iter().filter(|m| m.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.members.len() - self.delivered()
    }

    /// No fatal error and no member with a failed channel.
    pub fn is_clean(&self) -> bool {
        self.fatal.is_none() && self.failed() == 0
    }
}
