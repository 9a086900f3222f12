//! Shared test helpers for `daybrief-core` integration tests.
//!
//! In-memory mocks for every port, recording what the pipeline asked of
//! them so tests can assert on call counts and content.

#![allow(dead_code)]

pub mod channels;
pub mod directory;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use daybrief_core::{AccessToken, EscalationNotice, Escalator, TokenProvider};
use daybrief_domain::{DigestError, Event, Result as DomainResult};

pub fn analysis_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, hour, minute, 0).unwrap()
}

pub fn event(id: &str, subject: &str, start: (u32, u32), end: (u32, u32)) -> Event {
    Event::new(id, subject, at(start.0, start.1), at(end.0, end.1)).unwrap()
}

/// Token provider that replays a script of results, then keeps returning
/// the last one.
pub struct ScriptedTokenProvider {
    script: Mutex<VecDeque<DomainResult<AccessToken>>>,
    calls: AtomicU32,
}

impl ScriptedTokenProvider {
    pub fn new(script: Vec<DomainResult<AccessToken>>) -> Self {
        Self { script: Mutex::new(script.into()), calls: AtomicU32::new(0) }
    }

    pub fn ok() -> Self {
        Self::new(vec![Ok(AccessToken::new("test-token"))])
    }

    pub fn failing(detail: &str) -> Self {
        Self::new(vec![Err(DigestError::Authentication(detail.to_string()))])
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for ScriptedTokenProvider {
    async fn acquire_token(&self) -> DomainResult<AccessToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

/// Escalator that records every notice.
#[derive(Default, Clone)]
pub struct RecordingEscalator {
    notices: Arc<Mutex<Vec<EscalationNotice>>>,
    fail: bool,
}

impl RecordingEscalator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the notice, then reports failure.
    pub fn broken() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn notices(&self) -> Vec<EscalationNotice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.notices.lock().unwrap().len()
    }
}

#[async_trait]
impl Escalator for RecordingEscalator {
    async fn escalate(&self, notice: &EscalationNotice) -> DomainResult<()> {
        self.notices.lock().unwrap().push(notice.clone());
        if self.fail {
            Err(DigestError::Escalation("smtp relay refused".to_string()))
        } else {
            Ok(())
        }
    }
}
