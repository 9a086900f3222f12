//! Shared helpers for `daybrief-infra` integration tests.
//!
//! A wiremock server stands in for both the login endpoint and Graph; the
//! configuration built here points every adapter at it with zero-length
//! retry waits.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use daybrief_core::{EscalationNotice, Escalator};
use daybrief_domain::{ChannelKind, Credentials, DigestConfig, Result as DomainResult};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TENANT: &str = "tenant-1";
pub const SENDER: &str = "robot@example.com";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter("debug").try_init();
}

pub fn analysis_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
}

/// Configuration aimed at `server`, three attempts, no waits.
pub fn config_for(server: &MockServer) -> DigestConfig {
    let mut config = DigestConfig::default();
    config.credentials = Credentials {
        tenant_id: TENANT.into(),
        client_id: "client-1".into(),
        client_secret: "s3cr3t-value".into(),
    };
    config.endpoints.graph_base_url = server.uri();
    config.endpoints.login_base_url = server.uri();
    config.sender = Some(SENDER.into());
    config.retry.multiplier_secs = 0;
    config.retry.min_wait_secs = 0;
    config.retry.max_wait_secs = 0;
    config.retry.request_timeout_secs = 5;
    config.delivery.channels = ChannelKind::ALL.to_vec();
    config
}

pub fn token_path() -> String {
    format!("/{TENANT}/oauth2/v2.0/token")
}

pub fn user(id: &str, name: &str, mail: Option<&str>) -> Value {
    json!({"id": id, "displayName": name, "mail": mail, "userPrincipalName": format!("{id}@example.com")})
}

pub fn graph_event(id: &str, subject: &str, start: &str, end: &str) -> Value {
    json!({
        "id": id,
        "subject": subject,
        "start": {"dateTime": start, "timeZone": "UTC"},
        "end": {"dateTime": end, "timeZone": "UTC"},
        "isAllDay": false
    })
}

/// Escalator that keeps every notice it is given.
#[derive(Default)]
pub struct RecordingEscalator {
    notices: Mutex<Vec<EscalationNotice>>,
}

impl RecordingEscalator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<EscalationNotice> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Escalator for RecordingEscalator {
    async fn escalate(&self, notice: &EscalationNotice) -> DomainResult<()> {
        self.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }
}
