use std::fmt::Write as _;

use daybrief_core::Digest;
use daybrief_domain::ContentConfig;
use rand::Rng;

use super::{conflict_label, focus_label, pick, subject_label, time_label};

/// Plain-text chat message, addressed by first name.
pub fn render_chat<R>(digest: &Digest, content: &ContentConfig, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let mut text = String::with_capacity(512);
    let greeting = pick(&content.greeting_emojis, rng, "");
    let _ = writeln!(text, "Good morning, {}! {greeting}", digest.member.first_name());

    if digest.is_free_day() {
        let emoji = pick(&content.free_day_emojis, rng, "");
        let phrase = pick(&content.no_events_phrases, rng, "");
        let _ = write!(text, "\nNo events on your calendar today. {emoji} {phrase}");
        return text.trim_end().to_string();
    }

    text.push_str("\nToday's events:\n");
    for event in &digest.events {
        let emoji = pick(&content.meeting_emojis, rng, "-");
        let _ = write!(text, "{emoji} {} ({})", subject_label(event), time_label(event, digest.tz));
        if let Some(location) = event.location.as_deref().filter(|l| !l.trim().is_empty()) {
            let _ = write!(text, " @ {location}");
        }
        text.push('\n');
    }

    if !digest.conflicts.is_empty() {
        text.push_str("\nHeads up, these overlap:\n");
        for conflict in &digest.conflicts {
            let _ = writeln!(text, "- {}", conflict_label(conflict, digest.tz));
        }
    }

    if !digest.focus_blocks.is_empty() {
        text.push_str("\nFree for focus work:\n");
        for block in &digest.focus_blocks {
            let _ = writeln!(text, "- {}", focus_label(block));
        }
    }

    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::{busy_day, digest, rng};

    fn single_pools() -> ContentConfig {
        ContentConfig {
            no_events_phrases: vec!["Plan ahead.".into()],
            greeting_emojis: vec!["G".into()],
            meeting_emojis: vec!["M".into()],
            free_day_emojis: vec!["F".into()],
        }
    }

    #[test]
    fn greets_by_first_name() {
        let text = render_chat(&busy_day(), &single_pools(), &mut rng());
        assert!(text.starts_with("Good morning, Ana! G"));
        assert!(text.contains("M Planning <Q3> (09:00 - 10:00) @ Room 4"));
        assert!(text.contains("M Design review (09:30 - 11:00)\n"));
        assert!(text.contains("Heads up"));
        assert!(text.contains("11:00 - 17:00 (360 min)"));
    }

    #[test]
    fn free_day_message() {
        let text = render_chat(&digest(Vec::new(), chrono_tz::UTC), &single_pools(), &mut rng());
        assert_eq!(text, "Good morning, Ana! G\n\nNo events on your calendar today. F Plan ahead.");
    }
}
