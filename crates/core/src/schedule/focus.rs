//! Focus block discovery
//!
//! Events are placed on the work window's date, merged into busy spans,
//! clipped to the window, and the gaps between them that are at least
//! `min_block` long become focus blocks.
//!
//! An event that actually touches the window's local date keeps its real
//! local start and end, cut at that day's midnights: one that began the
//! day before is busy from 00:00, one that ends on a later day is busy until
//! 24:00. Events dated elsewhere are projected by local time of day.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use daybrief_domain::{AllDayPolicy, Event, FocusBlock, Interval, WorkWindow};

/// Free gaps of at least `window.min_block` inside the work window.
///
/// Blocks are chronological, never overlap, and never leave
/// `[window.start, window.end]`.
pub fn suggest_focus_blocks(
    events: &[Event],
    window: &WorkWindow,
    tz: Tz,
    policy: AllDayPolicy,
) -> Vec<FocusBlock> {
    let lower = window.start_at();
    let upper = window.end_at();

    let mut busy: Vec<Interval<NaiveDateTime>> = events
        .iter()
        .filter(|event| policy.admits(event))
        .map(|event| project(event, window, tz))
        .collect();
    busy.sort_by_key(|span| span.start);

    let mut blocks = Vec::new();
    let mut cursor = lower;
    for span in merge_touching(busy).iter().filter_map(|span| span.clip(lower, upper)) {
        blocks.extend(free_gap(cursor, span.start, window.min_block));
        cursor = cursor.max(span.end);
    }
    blocks.extend(free_gap(cursor, upper, window.min_block));

    blocks
}

/// Busy span of `event` on the window's date.
fn project(event: &Event, window: &WorkWindow, tz: Tz) -> Interval<NaiveDateTime> {
    if event.is_all_day {
        return window.as_interval();
    }

    let day_start = window.date.and_time(NaiveTime::default());
    let day_end = day_start + Duration::days(1);
    let local_start = event.start.with_timezone(&tz).naive_local();
    let local_end = event.end.with_timezone(&tz).naive_local();

    if local_start < day_end && local_end >= day_start {
        return Interval { start: local_start.max(day_start), end: local_end.min(day_end) };
    }

    let start = window.date.and_time(local_start.time());
    let mut end = window.date.and_time(local_end.time());
    // Crosses local midnight: busy until the end of the day.
    if end <= start && event.duration() > Duration::zero() {
        end = day_end;
    }

    Interval { start, end: end.max(start) }
}

/// Merge spans sorted by start; spans that overlap or share an endpoint fuse.
fn merge_touching(sorted: Vec<Interval<NaiveDateTime>>) -> Vec<Interval<NaiveDateTime>> {
    let mut merged: Vec<Interval<NaiveDateTime>> = Vec::with_capacity(sorted.len());
    for span in sorted {
        match merged.last_mut() {
            Some(current) if span.start <= current.end => current.end = current.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

fn free_gap(from: NaiveDateTime, until: NaiveDateTime, min_block: Duration) -> Option<FocusBlock> {
    (until > from && until - from >= min_block).then_some(FocusBlock { start: from, end: until })
}
