//! Notification pipeline
//!
//! [`BatchDriver`] runs one pass over the roster; for each member the
//! [`NotificationOrchestrator`] fetches the day's events, analyses them,
//! fans the resulting [`Digest`] out to every configured channel and
//! escalates anything short of full delivery.

pub mod batch;
pub mod escalation;
pub mod orchestrator;
pub mod ports;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use daybrief_domain::{ConflictSummary, Event, FocusBlock, Member};

pub use batch::BatchDriver;
pub use escalation::{escalate_best_effort, EscalationNotice};
pub use orchestrator::NotificationOrchestrator;
pub use ports::{AccessToken, DeliveryChannel, DirectoryGateway, Escalator, TokenProvider};

use crate::schedule::{DayWindow, ScheduleAnalysis};

/// Content handed to every channel for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub member: Member,
    /// Local date the digest covers.
    pub date: NaiveDate,
    pub tz: Tz,
    /// Chronological.
    pub events: Vec<Event>,
    pub conflicts: Vec<ConflictSummary>,
    pub focus_blocks: Vec<FocusBlock>,
}

impl Digest {
    pub fn new(member: Member, day: &DayWindow, mut events: Vec<Event>, analysis: ScheduleAnalysis) -> Self {
        events.sort_by_key(|event| event.start);
        Self {
            member,
            date: day.date,
            tz: day.tz,
            events,
            conflicts: analysis.conflicts,
            focus_blocks: analysis.focus_blocks,
        }
    }

    pub fn is_free_day(&self) -> bool {
        self.events.is_empty()
    }

    /// Wall-clock time of `instant` in the digest's zone.
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveTime {
        instant.with_timezone(&self.tz).time()
    }
}
