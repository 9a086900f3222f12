use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use daybrief_core::{AccessToken, DayWindow, DirectoryGateway};
use daybrief_domain::{DigestError, DirectoryEntry, Event, Member, Result as DomainResult};

pub fn entry(id: &str, name: &str, mail: &str) -> DirectoryEntry {
    DirectoryEntry {
        id: Some(id.to_string()),
        display_name: Some(name.to_string()),
        mail: Some(mail.to_string()),
        user_principal_name: None,
    }
}

/// In-memory mock for `DirectoryGateway`.
#[derive(Default, Clone)]
pub struct MockDirectory {
    roster: Option<Vec<DirectoryEntry>>,
    events: HashMap<String, Vec<Event>>,
    broken_calendars: HashSet<String>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MockDirectory {
    pub fn new(roster: Vec<DirectoryEntry>) -> Self {
        Self { roster: Some(roster), ..Self::default() }
    }

    /// Roster retrieval fails.
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn with_events(mut self, member_id: &str, events: Vec<Event>) -> Self {
        self.events.insert(member_id.to_string(), events);
        self
    }

    pub fn with_broken_calendar(mut self, member_id: &str) -> Self {
        self.broken_calendars.insert(member_id.to_string());
        self
    }

    /// Member ids whose events were requested, in request order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectoryGateway for MockDirectory {
    async fn list_members(&self, _token: &AccessToken) -> DomainResult<Vec<DirectoryEntry>> {
        self.roster
            .clone()
            .ok_or_else(|| DigestError::Data("GET /users returned HTTP 503".to_string()))
    }

    async fn events_for_day(
        &self,
        _token: &AccessToken,
        member: &Member,
        _day: &DayWindow,
    ) -> DomainResult<Vec<Event>> {
        self.fetched.lock().unwrap().push(member.id.clone());
        if self.broken_calendars.contains(&member.id) {
            return Err(DigestError::TransientNetwork("calendarView timed out".to_string()));
        }
        Ok(self.events.get(&member.id).cloned().unwrap_or_default())
    }
}
