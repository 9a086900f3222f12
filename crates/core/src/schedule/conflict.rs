//! Conflict detection
//!
//! Two events conflict when `max(start) < min(end)`. Touching endpoints do
//! not count: a meeting ending at 10:00 and another starting at 10:00 are
//! back to back, not double booked.

use daybrief_domain::{AllDayPolicy, ConflictPair, Event};

/// Every pair of admitted events whose intervals strictly overlap.
///
/// Events are stable-sorted by start instant, so pairs come out in the order
/// of their first event and `pair.first` always starts no later than
/// `pair.second`. Each unordered pair appears exactly once.
pub fn detect_conflicts(events: &[Event], policy: AllDayPolicy) -> Vec<ConflictPair<'_>> {
    let mut sorted: Vec<&Event> = events.iter().filter(|event| policy.admits(event)).collect();
    sorted.sort_by_key(|event| event.start);

    let mut pairs = Vec::new();
    for (index, first) in sorted.iter().enumerate() {
        let span = first.interval();
        for second in &sorted[index + 1..] {
            // Later events start even later, so none of them can overlap `first`.
            if second.start >= first.end {
                break;
            }
            if span.overlaps(&second.interval()) {
                pairs.push(ConflictPair { first, second });
            }
        }
    }

    pairs
}
