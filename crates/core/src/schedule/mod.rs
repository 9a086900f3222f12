//! Schedule analysis engine
//!
//! Pure functions over one member's events for one day: which events collide
//! ([`detect_conflicts`]) and where the free time is
//! ([`suggest_focus_blocks`]). [`ScheduleAnalyzer`] bundles both with the
//! configured work window and all-day policy.

pub mod conflict;
pub mod focus;
pub mod window;

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use daybrief_domain::{
    AllDayPolicy, ConflictSummary, Event, FocusBlock, Result, ScheduleConfig, WorkWindow,
};

pub use conflict::detect_conflicts;
pub use focus::suggest_focus_blocks;
pub use window::DayWindow;

/// Conflicts and focus blocks for one member's day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleAnalysis {
    pub conflicts: Vec<ConflictSummary>,
    pub focus_blocks: Vec<FocusBlock>,
}

/// Runs both analyses with fixed settings.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleAnalyzer {
    tz: Tz,
    work_start: NaiveTime,
    work_end: NaiveTime,
    min_focus_minutes: u32,
    policy: AllDayPolicy,
}

impl ScheduleAnalyzer {
    /// Validates the work window once so [`analyze`](Self::analyze) cannot fail.
    pub fn new(
        tz: Tz,
        work_start: NaiveTime,
        work_end: NaiveTime,
        min_focus_minutes: u32,
        policy: AllDayPolicy,
    ) -> Result<Self> {
        WorkWindow::new(NaiveDate::default(), work_start, work_end, min_focus_minutes)?;
        Ok(Self { tz, work_start, work_end, min_focus_minutes, policy })
    }

    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        Self::new(
            config.timezone()?,
            config.work_start,
            config.work_end,
            config.min_focus_minutes,
            config.all_day_policy,
        )
    }

    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    pub const fn policy(&self) -> AllDayPolicy {
        self.policy
    }

    /// The work window on `date`.
    pub fn work_window(&self, date: NaiveDate) -> WorkWindow {
        WorkWindow {
            date,
            start: self.work_start,
            end: self.work_end,
            min_block: chrono::Duration::minutes(i64::from(self.min_focus_minutes)),
        }
    }

    /// Analyse `events` for the local day `date`.
    ///
    /// Deterministic: the same input always yields the same output.
    pub fn analyze(&self, events: &[Event], date: NaiveDate) -> ScheduleAnalysis {
        let conflicts = detect_conflicts(events, self.policy)
            .iter()
            .map(|pair| pair.summarise())
            .collect();
        let focus_blocks =
            suggest_focus_blocks(events, &self.work_window(date), self.tz, self.policy);

        ScheduleAnalysis { conflicts, focus_blocks }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn rejects_inverted_work_window() {
        let result = ScheduleAnalyzer::new(Tz::UTC, hm(17, 0), hm(9, 0), 60, AllDayPolicy::Exclude);
        assert!(result.is_err());
    }

    #[test]
    fn analysis_is_repeatable() {
        let analyzer =
            ScheduleAnalyzer::from_config(&ScheduleConfig::default()).expect("default schedule");
        let events = vec![
            Event::new(
                "a",
                "Standup",
                Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 5, 6, 10, 30, 0).unwrap(),
            )
            .unwrap(),
            Event::new(
                "b",
                "Review",
                Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 5, 6, 11, 0, 0).unwrap(),
            )
            .unwrap(),
        ];
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();

        let first = analyzer.analyze(&events, date);
        let second = analyzer.analyze(&events, date);

        assert_eq!(first, second);
        assert_eq!(first.conflicts.len(), 1);
        assert_eq!(first.conflicts[0].first_subject, "Standup");
        assert_eq!(first.focus_blocks.len(), 1);
        assert_eq!(first.focus_blocks[0].start.time(), hm(11, 0));
    }
}
