//! Run configuration
//!
//! [`DigestConfig`] is built once at start-up (file, then environment
//! overrides), validated, and then shared read-only by every component.
//! Nothing in the pipeline reads ambient global state.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BACKOFF_MULTIPLIER_SECS, DEFAULT_FILE_DROP_FOLDER, DEFAULT_GRAPH_BASE_URL,
    DEFAULT_GRAPH_SCOPE, DEFAULT_LOGIN_BASE_URL, DEFAULT_LOG_LEVEL, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_WAIT_SECS, DEFAULT_MIN_FOCUS_MINUTES,
    DEFAULT_MIN_WAIT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SMTP_PORT,
    DEFAULT_SMTP_TIMEOUT_SECS, DEFAULT_TIMEZONE, FREE_DAY_EMOJIS, GREETING_EMOJIS,
    MEETING_EMOJIS, NO_EVENTS_PHRASES,
};
use crate::errors::{DigestError, Result};
use crate::impl_keyword_conversions;
use crate::types::{AllDayPolicy, ChannelKind};

/// Complete configuration for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    /// Mailbox that sends digests and opens chats. Defaults to the admin
    /// address when unset.
    pub sender: Option<String>,
    pub admin: AdminConfig,
    pub schedule: ScheduleConfig,
    pub retry: RetrySettings,
    pub delivery: DeliveryConfig,
    pub content: ContentConfig,
    pub logging: LoggingConfig,
}

impl DigestConfig {
    /// Sender mailbox for mail and chat, falling back to the admin address.
    pub fn sender_mailbox(&self) -> Option<&str> {
        self.sender.as_deref().or(self.admin.email.as_deref()).filter(|s| !s.trim().is_empty())
    }

    /// Check the configuration can drive a run.
    ///
    /// Missing credentials are reported first and on their own so callers can
    /// escalate them distinctly from other mistakes.
    pub fn validate(&self) -> Result<()> {
        let missing = self.credentials.missing_fields();
        if !missing.is_empty() {
            return Err(DigestError::Config(format!(
                "missing credentials: {}",
                missing.join(", ")
            )));
        }

        let mut problems = Vec::new();

        if let Err(err) = self.schedule.timezone() {
            problems.push(err.to_string());
        }
        if self.schedule.work_start >= self.schedule.work_end {
            problems.push(format!(
                "schedule.work_start ({}) must be before schedule.work_end ({})",
                self.schedule.work_start.format("%H:%M"),
                self.schedule.work_end.format("%H:%M")
            ));
        }
        if self.retry.max_attempts == 0 {
            problems.push("retry.max_attempts must be at least 1".to_string());
        }
        if self.retry.min_wait_secs > self.retry.max_wait_secs {
            problems.push("retry.min_wait_secs must not exceed retry.max_wait_secs".to_string());
        }
        if self.retry.request_timeout_secs == 0 {
            problems.push("retry.request_timeout_secs must be positive".to_string());
        }
        if self.delivery.channels.is_empty() {
            problems.push("delivery.channels must name at least one channel".to_string());
        }
        if self.delivery.max_concurrency == 0 {
            problems.push("delivery.max_concurrency must be at least 1".to_string());
        }
        let needs_sender = self
            .delivery
            .channels
            .iter()
            .any(|c| matches!(c, ChannelKind::Email | ChannelKind::Chat));
        if needs_sender && self.sender_mailbox().is_none() {
            problems.push("sender (or admin.email) is required for email and chat delivery".into());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DigestError::Config(problems.join("; ")))
        }
    }
}

/// Application credentials for the client-credentials grant.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
}

impl Credentials {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("tenant_id", &self.tenant_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &redacted(&self.client_secret))
            .finish()
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub graph_base_url: String,
    pub login_base_url: String,
    pub scope: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            login_base_url: DEFAULT_LOGIN_BASE_URL.to_string(),
            scope: DEFAULT_GRAPH_SCOPE.to_string(),
        }
    }
}

/// Where failure reports go.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: Option<String>,
    pub smtp: Option<SmtpSettings>,
}

/// Direct mail transport for escalations, independent of the API token.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Envelope sender; defaults to `username`.
    pub from: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_SMTP_PORT,
            username: String::new(),
            password: String::new(),
            from: None,
            timeout_secs: DEFAULT_SMTP_TIMEOUT_SECS,
        }
    }
}

impl SmtpSettings {
    /// Host, username and password are all present.
    pub fn is_complete(&self) -> bool {
        ![&self.host, &self.username, &self.password].iter().any(|v| v.trim().is_empty())
    }

    pub fn from_address(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.username)
    }
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &redacted(&self.password))
            .field("from", &self.from)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// IANA zone name defining "today" and local clock times.
    pub timezone: String,
    #[serde(with = "clock_time")]
    pub work_start: NaiveTime,
    #[serde(with = "clock_time")]
    pub work_end: NaiveTime,
    pub min_focus_minutes: u32,
    pub all_day_policy: AllDayPolicy,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            work_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
            min_focus_minutes: DEFAULT_MIN_FOCUS_MINUTES,
            all_day_policy: AllDayPolicy::Exclude,
        }
    }
}

impl ScheduleConfig {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| DigestError::Config(format!("unknown time zone '{}'", self.timezone)))
    }
}

/// Call-guard settings shared by the token exchange and every API call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub multiplier_secs: u64,
    pub min_wait_secs: u64,
    pub max_wait_secs: u64,
    /// Per-request timeout, separate from the waits between attempts.
    pub request_timeout_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            multiplier_secs: DEFAULT_BACKOFF_MULTIPLIER_SECS,
            min_wait_secs: DEFAULT_MIN_WAIT_SECS,
            max_wait_secs: DEFAULT_MAX_WAIT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl RetrySettings {
    pub const fn multiplier(&self) -> Duration {
        Duration::from_secs(self.multiplier_secs)
    }

    pub const fn min_wait(&self) -> Duration {
        Duration::from_secs(self.min_wait_secs)
    }

    pub const fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Channels attempted for every member, in order.
    pub channels: Vec<ChannelKind>,
    /// Members processed at once; 1 keeps the run sequential.
    pub max_concurrency: usize,
    /// Drive folder the agenda file is written to.
    pub file_drop_folder: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            channels: ChannelKind::ALL.to_vec(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            file_drop_folder: DEFAULT_FILE_DROP_FOLDER.to_string(),
        }
    }
}

/// Phrase and emoji pools rendering draws from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub no_events_phrases: Vec<String>,
    pub greeting_emojis: Vec<String>,
    pub meeting_emojis: Vec<String>,
    pub free_day_emojis: Vec<String>,
}

fn owned(pool: &[&str]) -> Vec<String> {
    pool.iter().map(ToString::to_string).collect()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            no_events_phrases: owned(NO_EVENTS_PHRASES),
            greeting_emojis: owned(GREETING_EMOJIS),
            meeting_emojis: owned(MEETING_EMOJIS),
            free_day_emojis: owned(FREE_DAY_EMOJIS),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl_keyword_conversions!(LogFormat {
    Text => "text",
    Json => "json",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
    /// Append logs to this file in addition to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), format: LogFormat::Text, file: None }
    }
}

/// Parse `HH:MM` (or `HH:MM:SS`) wall-clock times.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| DigestError::Config(format!("invalid clock time '{value}', expected HH:MM")))
}

/// Serde adapter storing [`NaiveTime`] as `"HH:MM"`.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock_time(&raw).map_err(de::Error::custom)
    }
}
