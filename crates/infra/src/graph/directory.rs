//! Roster and calendar retrieval.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use daybrief_core::{AccessToken, DayWindow, DirectoryGateway};
use daybrief_domain::{
    Attendee, DigestError, DirectoryEntry, Event, Member, Organizer, Result,
};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::client::{endpoint_of, GraphClient};
use super::errors::GraphError;
use super::wire::{EmailAddress, EventDateTime, GraphEvent, GraphUser, Page};

const USER_SELECT: &str = "id,displayName,mail,userPrincipalName";
const EVENT_SELECT: &str = "id,subject,bodyPreview,start,end,location,organizer,attendees,isAllDay";
const OUTLOOK_TIMEZONE_HEADER: &str = r#"outlook.timezone="UTC""#;
const MAX_PAGES: usize = 200;

/// Graph-backed [`DirectoryGateway`].
#[derive(Debug, Clone)]
pub struct GraphDirectory {
    client: GraphClient,
    page_limit: usize,
}

impl GraphDirectory {
    pub const fn new(client: GraphClient) -> Self {
        Self { client, page_limit: MAX_PAGES }
    }

    /// Most pages read from one collection before giving up on it.
    #[must_use]
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// Follow `@odata.nextLink` until the collection is exhausted.
    ///
    /// A collection that still has a next page after `page_limit` pages is
    /// an error rather than a silently shortened list.
    async fn collect_pages<T>(
        &self,
        token: &AccessToken,
        first: String,
        prefer: Option<&str>,
    ) -> std::result::Result<Vec<T>, GraphError>
    where
        T: DeserializeOwned + Send,
    {
        let mut items = Vec::new();
        let mut next = Some(first);
        let mut pages = 0;

        while let Some(url) = next.take() {
            let page: Page<T> = self.client.get_with_prefer(token, &url, prefer).await?;
            items.extend(page.value);
            pages += 1;
            if let Some(link) = page.next_link {
                if pages >= self.page_limit {
                    warn!(pages, "page limit reached with more results pending");
                    return Err(GraphError::Parse {
                        endpoint: endpoint_of(&link),
                        message: format!("collection has more than {} pages", self.page_limit),
                    });
                }
                next = Some(link);
            }
        }

        debug!(pages, items = items.len(), "collection fetched");
        Ok(items)
    }
}

#[async_trait]
impl DirectoryGateway for GraphDirectory {
    #[instrument(skip_all)]
    async fn list_members(&self, token: &AccessToken) -> Result<Vec<DirectoryEntry>> {
        let first = format!("/users?$select={USER_SELECT}");
        let users: Vec<GraphUser> = self
            .collect_pages(token, first, None)
            .await
            .map_err(|err| DigestError::Data(format!("member list unavailable: {err}")))?;

        if users.is_empty() {
            return Err(DigestError::Data("member list is empty".into()));
        }

        Ok(users
            .into_iter()
            .map(|user| DirectoryEntry {
                id: user.id,
                display_name: user.display_name,
                mail: user.mail,
                user_principal_name: user.user_principal_name,
            })
            .collect())
    }

    #[instrument(skip_all, fields(member_id = %member.id, date = %day.date))]
    async fn events_for_day(
        &self,
        token: &AccessToken,
        member: &Member,
        day: &DayWindow,
    ) -> Result<Vec<Event>> {
        let first = calendar_view_path(&member.id, day);
        let raw: Vec<GraphEvent> = self
            .collect_pages(token, first, Some(OUTLOOK_TIMEZONE_HEADER))
            .await
            .map_err(DigestError::from)?;

        let total = raw.len();
        let events: Vec<Event> = raw.into_iter().filter_map(map_event).collect();
        if events.len() < total {
            warn!(dropped = total - events.len(), "dropped unusable calendar entries");
        }
        Ok(events)
    }
}

fn calendar_view_path(member_id: &str, day: &DayWindow) -> String {
    format!(
        "/users/{}/calendarView?startDateTime={}&endDateTime={}&$select={EVENT_SELECT}&$orderby={}",
        urlencoding::encode(member_id),
        urlencoding::encode(&format_instant(day.start)),
        urlencoding::encode(&format_instant(day.end)),
        urlencoding::encode("start/dateTime"),
    )
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn map_event(raw: GraphEvent) -> Option<Event> {
    let id = raw.id.filter(|id| !id.trim().is_empty())?;
    let (Some(start), Some(end)) = (raw.start.as_ref(), raw.end.as_ref()) else {
        warn!(event_id = %id, "event has no start or end");
        return None;
    };
    let (Some(start), Some(end)) = (parse_event_time(start), parse_event_time(end)) else {
        warn!(event_id = %id, "event time could not be parsed");
        return None;
    };

    let subject = raw.subject.filter(|s| !s.trim().is_empty()).unwrap_or_default();
    let mut event = match Event::new(id.clone(), subject, start, end) {
        Ok(event) => event.all_day(raw.is_all_day),
        Err(err) => {
            warn!(event_id = %id, error = %err, "dropping event");
            return None;
        }
    };

    if let Some(preview) = raw.body_preview.filter(|p| !p.trim().is_empty()) {
        event = event.with_body_preview(preview);
    }
    if let Some(location) =
        raw.location.and_then(|l| l.display_name).filter(|l| !l.trim().is_empty())
    {
        event = event.with_location(location);
    }
    if let Some(organizer) = raw.organizer.and_then(|o| o.email_address).and_then(to_organizer) {
        event = event.with_organizer(organizer);
    }
    let attendees: Vec<Attendee> = raw
        .attendees
        .unwrap_or_default()
        .into_iter()
        .filter_map(|attendee| {
            let EmailAddress { name, address } = attendee.email_address?;
            let address = address.map(|a| a.trim().to_string()).filter(|a| !a.is_empty());
            if name.is_none() && address.is_none() {
                return None;
            }
            Some(Attendee {
                name,
                address,
                response: attendee.status.and_then(|s| s.response),
            })
        })
        .collect();

    Some(event.with_attendees(attendees))
}

fn to_organizer(email: EmailAddress) -> Option<Organizer> {
    let name = email.name.filter(|n| !n.trim().is_empty());
    let address = email.address.filter(|a| !a.trim().is_empty());
    if name.is_none() && address.is_none() {
        return None;
    }
    Some(Organizer { name, address })
}

/// Parse a Graph `dateTimeTimeZone` into an instant.
///
/// Values carrying an offset are taken as-is; naive values are read in the
/// named zone, falling back to UTC when the name is unknown.
pub(crate) fn parse_event_time(value: &EventDateTime) -> Option<DateTime<Utc>> {
    let text = value.date_time.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .ok()?;

    match value.time_zone.as_deref().map(str::trim) {
        None | Some("") => Some(Utc.from_utc_datetime(&naive)),
        Some(zone) if zone.eq_ignore_ascii_case("utc") => Some(Utc.from_utc_datetime(&naive)),
        Some(zone) => match zone.parse::<Tz>() {
            Ok(tz) => tz.from_local_datetime(&naive).earliest().map(|local| local.with_timezone(&Utc)),
            Err(_) => {
                warn!(time_zone = zone, "unknown event time zone, reading as UTC");
                Some(Utc.from_utc_datetime(&naive))
            }
        },
    }
}
