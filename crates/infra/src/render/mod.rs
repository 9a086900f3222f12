//! Digest rendering
//!
//! Turns a [`Digest`](daybrief_core::Digest) into the text each channel
//! sends. Rendering is synchronous and takes the random source as a
//! parameter, so callers never hold an RNG across an `.await` and tests can
//! pass a seeded one.

pub mod chat;
pub mod email;
pub mod file;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use daybrief_domain::{ConflictSummary, Event, FocusBlock};
use rand::seq::SliceRandom;
use rand::Rng;

pub use chat::render_chat;
pub use email::{render_email, EmailContent};
pub use file::{file_name, render_file};

pub const ALL_DAY_LABEL: &str = "All day";
pub const NO_LOCATION_LABEL: &str = "Location not specified";
pub const UNTITLED_LABEL: &str = "(no title)";

/// `HH:MM - HH:MM` in `tz`, or `All day`.
pub fn time_label(event: &Event, tz: Tz) -> String {
    if event.is_all_day {
        return ALL_DAY_LABEL.to_string();
    }
    format!("{} - {}", clock(event.start, tz), clock(event.end, tz))
}

pub fn location_label(event: &Event) -> &str {
    event.location.as_deref().filter(|l| !l.trim().is_empty()).unwrap_or(NO_LOCATION_LABEL)
}

pub fn subject_label(event: &Event) -> &str {
    let subject = event.subject.trim();
    if subject.is_empty() {
        UNTITLED_LABEL
    } else {
        subject
    }
}

pub fn conflict_label(conflict: &ConflictSummary, tz: Tz) -> String {
    format!(
        "{} overlaps {} ({} - {})",
        conflict.first_subject,
        conflict.second_subject,
        clock(conflict.overlap.start, tz),
        clock(conflict.overlap.end, tz)
    )
}

pub fn focus_label(block: &FocusBlock) -> String {
    format!(
        "{} - {} ({} min)",
        block.start.format("%H:%M"),
        block.end.format("%H:%M"),
        block.minutes()
    )
}

pub fn date_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn clock(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}

/// Random entry from `pool`, or `fallback` when the pool is empty.
pub fn pick<'a, R>(pool: &'a [String], rng: &mut R, fallback: &'a str) -> &'a str
where
    R: Rng + ?Sized,
{
    pool.choose(rng).map_or(fallback, String::as_str)
}

/// Escape text for interpolation into HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
