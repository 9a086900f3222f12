//! Calendar event and interval types

use std::cmp::{max, min};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DigestError, Result};

/// Organizer of an event as reported by the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Attendee record, kept in the order the calendar returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: Option<String>,
    pub address: Option<String>,
    /// Response status such as `accepted` or `tentativelyAccepted`.
    pub response: Option<String>,
}

/// A single commitment on a member's calendar for the analysis day.
///
/// `start <= end` holds for every value built through [`Event::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub subject: String,
    pub body_preview: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    pub organizer: Option<Organizer>,
    pub attendees: Vec<Attendee>,
    pub is_all_day: bool,
}

impl Event {
    /// Create a timed event, rejecting an end that precedes the start.
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self> {
        let id = id.into();
        if end < start {
            return Err(DigestError::Data(format!(
                "event {id} ends ({end}) before it starts ({start})"
            )));
        }

        Ok(Self {
            id,
            subject: subject.into(),
            body_preview: None,
            start,
            end,
            location: None,
            organizer: None,
            attendees: Vec::new(),
            is_all_day: false,
        })
    }

    pub fn with_body_preview(mut self, preview: impl Into<String>) -> Self {
        self.body_preview = Some(preview.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_organizer(mut self, organizer: Organizer) -> Self {
        self.organizer = Some(organizer);
        self
    }

    pub fn with_attendees(mut self, attendees: Vec<Attendee>) -> Self {
        self.attendees = attendees;
        self
    }

    /// Mark the event as all-day.
    pub const fn all_day(mut self, is_all_day: bool) -> Self {
        self.is_all_day = is_all_day;
        self
    }

    /// The event's span as an interval of instants.
    pub const fn interval(&self) -> Interval<DateTime<Utc>> {
        Interval { start: self.start, end: self.end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// A half-open `(start, end)` pair over any ordered point type.
///
/// Two overlap notions are offered because collision detection and busy-time
/// merging disagree on touching endpoints: [`Interval::overlaps`] is strict,
/// [`Interval::touches`] is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval<T> {
    pub start: T,
    pub end: T,
}

impl<T: Ord + Copy> Interval<T> {
    /// Build an interval, returning `None` when `end < start`.
    pub fn new(start: T, end: T) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// `max(starts) < min(ends)`: sharing only an endpoint is not an overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        max(self.start, other.start) < min(self.end, other.end)
    }

    /// Inclusive test used for merging: `other.start <= self.end` and vice versa.
    pub fn touches(&self, other: &Self) -> bool {
        other.start <= self.end && self.start <= other.end
    }

    /// The common part of two intervals, if they strictly overlap.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        self.overlaps(other).then(|| Self {
            start: max(self.start, other.start),
            end: min(self.end, other.end),
        })
    }

    /// Restrict the interval to `[lower, upper]`, discarding it when nothing
    /// of positive length remains.
    pub fn clip(&self, lower: T, upper: T) -> Option<Self> {
        let start = max(self.start, lower);
        let end = min(self.end, upper);
        (start < end).then_some(Self { start, end })
    }
}
