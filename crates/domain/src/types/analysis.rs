//! Outputs and parameters of the schedule analysis

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::{Event, Interval};
use crate::errors::{DigestError, Result};
use crate::impl_keyword_conversions;

/// How all-day events take part in analysis.
///
/// All-day events carry nominal clock times, so neither choice is implied by
/// the data. `Exclude` leaves them out of both conflict detection and focus
/// blocks. `Include` treats them as busy for the whole work window and lets
/// them collide with anything they overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllDayPolicy {
    #[default]
    Exclude,
    Include,
}

impl_keyword_conversions!(AllDayPolicy {
    Exclude => "exclude",
    Include => "include",
});

impl AllDayPolicy {
    /// Whether `event` should be considered at all under this policy.
    pub const fn admits(self, event: &Event) -> bool {
        !event.is_all_day || matches!(self, Self::Include)
    }
}

/// Two events whose intervals strictly overlap.
///
/// Borrowed from the analysed slice; lives only as long as the analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictPair<'a> {
    /// The event that sorts first by start instant.
    pub first: &'a Event,
    pub second: &'a Event,
}

impl ConflictPair<'_> {
    /// The span both events occupy.
    pub fn overlap(&self) -> Interval<DateTime<Utc>> {
        let (a, b) = (self.first.interval(), self.second.interval());
        a.intersection(&b).unwrap_or(Interval { start: b.start, end: b.start })
    }

    /// Order-insensitive identity of the pair.
    pub fn key(&self) -> (String, String) {
        let (a, b) = (self.first.id.clone(), self.second.id.clone());
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn summarise(&self) -> ConflictSummary {
        ConflictSummary {
            first_subject: self.first.subject.clone(),
            second_subject: self.second.subject.clone(),
            overlap: self.overlap(),
        }
    }
}

/// Owned description of a conflict, attached to outgoing content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSummary {
    pub first_subject: String,
    pub second_subject: String,
    pub overlap: Interval<DateTime<Utc>>,
}

/// Contiguous free time inside the work window, in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FocusBlock {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl FocusBlock {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn minutes(&self) -> i64 {
        self.duration().num_minutes()
    }
}

/// The window focus blocks are searched in: one local date between two
/// wall-clock times, plus the shortest gap worth reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub min_block: Duration,
}

impl WorkWindow {
    /// Build a window, requiring `start < end` and a non-negative minimum.
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime, min_minutes: u32) -> Result<Self> {
        if start >= end {
            return Err(DigestError::Config(format!(
                "work window start {start} must be before end {end}"
            )));
        }

        Ok(Self { date, start, end, min_block: Duration::minutes(i64::from(min_minutes)) })
    }

    pub fn start_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    pub fn end_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end)
    }

    pub fn as_interval(&self) -> Interval<NaiveDateTime> {
        Interval { start: self.start_at(), end: self.end_at() }
    }
}
