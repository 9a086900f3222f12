use std::fmt::Write as _;

use chrono::NaiveDate;
use daybrief_core::Digest;
use daybrief_domain::ContentConfig;
use rand::Rng;

use super::{date_label, pick, subject_label, time_label};

pub fn file_name(date: NaiveDate) -> String {
    format!("Agenda - {}.txt", date_label(date))
}

/// Numbered plain-text agenda for the file drop.
pub fn render_file<R>(digest: &Digest, content: &ContentConfig, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let mut text = String::with_capacity(512);
    let _ = writeln!(text, "Agenda - {}", date_label(digest.date));
    let _ = writeln!(text, "User: {}\n", digest.member.display_name);

    if digest.is_free_day() {
        text.push_str("You have no events scheduled for today.\n\n");
        text.push_str(pick(&content.no_events_phrases, rng, ""));
        text.push('\n');
        return text;
    }

    text.push_str("TODAY'S EVENTS:\n");
    text.push_str("===============\n\n");
    for (index, event) in digest.events.iter().enumerate() {
        let _ = writeln!(text, "Event {}:", index + 1);
        let _ = writeln!(text, "Title: {}", subject_label(event));
        let _ = writeln!(text, "Time: {}", time_label(event, digest.tz));
        if let Some(location) = event.location.as_deref().filter(|l| !l.trim().is_empty()) {
            let _ = writeln!(text, "Location: {location}");
        }
        if let Some(name) = event.organizer.as_ref().and_then(|o| o.name.as_deref()) {
            let _ = writeln!(text, "Organizer: {name}");
        }
        if let Some(preview) = event.body_preview.as_deref() {
            let _ = writeln!(text, "Description: {preview}");
        }
        text.push('\n');
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::{busy_day, digest, rng};

    #[test]
    fn numbered_listing() {
        let text = render_file(&busy_day(), &ContentConfig::default(), &mut rng());
        let expected_first = "Event 1:\nTitle: Planning <Q3>\nTime: 09:00 - 10:00\nLocation: Room 4\nOrganizer: Bruno\nDescription: Agenda & notes\n\n";

        assert!(text.starts_with("Agenda - 2024-05-06\nUser: Ana Souza\n\nTODAY'S EVENTS:\n"));
        assert!(text.contains(expected_first));
        assert!(text.contains("Event 2:\nTitle: Design review\nTime: 09:30 - 11:00\n\n"));
    }

    #[test]
    fn free_day_text() {
        let content = ContentConfig { no_events_phrases: vec!["Rest.".into()], ..Default::default() };
        let text = render_file(&digest(Vec::new(), chrono_tz::UTC), &content, &mut rng());
        assert!(text.ends_with("You have no events scheduled for today.\n\nRest.\n"));
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        assert_eq!(file_name(date), "Agenda - 2024-05-06.txt");
    }
}
