//! Reference properties of the schedule analysis engine.

mod support;

use std::collections::BTreeSet;

use chrono::NaiveTime;
use chrono_tz::Tz;
use daybrief_core::{detect_conflicts, suggest_focus_blocks};
use daybrief_domain::{AllDayPolicy, Event, FocusBlock, WorkWindow};
use support::{analysis_date, event};

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn nine_to_five() -> WorkWindow {
    WorkWindow::new(analysis_date(), hm(9, 0), hm(17, 0), 60).unwrap()
}

fn blocks(events: &[Event]) -> Vec<(NaiveTime, NaiveTime)> {
    suggest_focus_blocks(events, &nine_to_five(), Tz::UTC, AllDayPolicy::Exclude)
        .iter()
        .map(|block: &FocusBlock| (block.start.time(), block.end.time()))
        .collect()
}

#[test]
fn no_events_yields_whole_window() {
    assert_eq!(blocks(&[]), vec![(hm(9, 0), hm(17, 0))]);
}

#[test]
fn gaps_around_two_meetings() {
    let events =
        [event("a", "A", (9, 0), (10, 0)), event("b", "B", (11, 0), (12, 0))];
    assert_eq!(blocks(&events), vec![(hm(10, 0), hm(11, 0)), (hm(12, 0), hm(17, 0))]);
}

#[test]
fn overlapping_meetings_conflict_once_and_merge_for_focus() {
    let events =
        [event("a", "A", (9, 0), (10, 30)), event("b", "B", (10, 0), (11, 0))];

    assert_eq!(detect_conflicts(&events, AllDayPolicy::Exclude).len(), 1);
    assert_eq!(blocks(&events), vec![(hm(11, 0), hm(17, 0))]);
}

#[test]
fn every_strict_overlap_is_reported_exactly_once() {
    let events = [
        event("a", "A", (9, 0), (12, 0)),
        event("b", "B", (9, 30), (10, 0)),
        event("c", "C", (10, 0), (10, 30)),
        event("d", "D", (11, 0), (13, 0)),
        event("e", "E", (13, 0), (14, 0)),
    ];

    let pairs = detect_conflicts(&events, AllDayPolicy::Exclude);
    let keys: Vec<_> = pairs.iter().map(|pair| pair.key()).collect();
    let unique: BTreeSet<_> = keys.iter().cloned().collect();

    assert_eq!(keys.len(), unique.len());
    let expected: BTreeSet<_> = [("a", "b"), ("a", "c"), ("a", "d")]
        .into_iter()
        .map(|(x, y)| (x.to_string(), y.to_string()))
        .collect();
    assert_eq!(unique, expected);
}

#[test]
fn analysis_is_idempotent() {
    let events = [
        event("a", "A", (9, 0), (10, 30)),
        event("b", "B", (10, 0), (11, 0)),
        event("c", "C", (14, 0), (15, 0)),
    ];

    let first: Vec<_> = detect_conflicts(&events, AllDayPolicy::Exclude)
        .iter()
        .map(|pair| pair.key())
        .collect();
    let second: Vec<_> = detect_conflicts(&events, AllDayPolicy::Exclude)
        .iter()
        .map(|pair| pair.key())
        .collect();

    assert_eq!(first, second);
    assert_eq!(blocks(&events), blocks(&events));
}
