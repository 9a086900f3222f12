use std::fmt::Write as _;

use daybrief_core::Digest;
use daybrief_domain::ContentConfig;
use rand::Rng;

use super::{
    conflict_label, date_label, escape_html, focus_label, location_label, pick, subject_label,
    time_label,
};

/// Subject and HTML body of a digest mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

pub fn email_subject(digest: &Digest) -> String {
    format!("Your agenda for today - {}", date_label(digest.date))
}

pub fn render_email<R>(digest: &Digest, content: &ContentConfig, rng: &mut R) -> EmailContent
where
    R: Rng + ?Sized,
{
    let mut html = String::with_capacity(1024);
    let name = escape_html(&digest.member.display_name);
    let date = escape_html(&date_label(digest.date));

    html.push_str("<!DOCTYPE html><html><body style=\"font-family: sans-serif;\">");
    let _ = write!(html, "<h2>Good morning, {name}!</h2><p>Your agenda for {date}:</p>");

    if digest.is_free_day() {
        let phrase = pick(&content.no_events_phrases, rng, "");
        let _ = write!(
            html,
            "<p>You have no events scheduled for today.</p><p><em>{}</em></p>",
            escape_html(phrase)
        );
    } else {
        html.push_str("<ul>");
        for event in &digest.events {
            let _ = write!(
                html,
                "<li><strong>{}</strong><br>{}<br>{}",
                escape_html(subject_label(event)),
                escape_html(&time_label(event, digest.tz)),
                escape_html(location_label(event)),
            );
            if let Some(preview) = event.body_preview.as_deref() {
                let _ = write!(html, "<br><small>{}</small>", escape_html(preview));
            }
            html.push_str("</li>");
        }
        html.push_str("</ul>");
    }

    if !digest.conflicts.is_empty() {
        html.push_str("<h3>Conflicts</h3><ul>");
        for conflict in &digest.conflicts {
            let _ = write!(html, "<li>{}</li>", escape_html(&conflict_label(conflict, digest.tz)));
        }
        html.push_str("</ul>");
    }

    if !digest.focus_blocks.is_empty() {
        html.push_str("<h3>Focus time</h3><ul>");
        for block in &digest.focus_blocks {
            let _ = write!(html, "<li>{}</li>", escape_html(&focus_label(block)));
        }
        html.push_str("</ul>");
    }

    html.push_str("</body></html>");
    EmailContent { subject: email_subject(digest), html }
}
