//! Application constants
//!
//! Defaults for every configuration value that has one, and the phrase and
//! emoji pools used when rendering digests.

// Remote endpoints
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_LOGIN_BASE_URL: &str = "https://login.microsoftonline.com";
pub const DEFAULT_GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

// Call guard: 3 attempts, waits clamp(1s * 2^(n-1), 4s, 10s)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_MULTIPLIER_SECS: u64 = 1;
pub const DEFAULT_MIN_WAIT_SECS: u64 = 4;
pub const DEFAULT_MAX_WAIT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Schedule analysis
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_WORK_START: &str = "09:00";
pub const DEFAULT_WORK_END: &str = "17:00";
pub const DEFAULT_MIN_FOCUS_MINUTES: u32 = 60;

// Delivery
pub const DEFAULT_MAX_CONCURRENCY: usize = 1;
pub const DEFAULT_FILE_DROP_FOLDER: &str = "Daily Agenda";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable holding an explicit configuration file path.
pub const CONFIG_PATH_ENV: &str = "DAYBRIEF_CONFIG";

pub const NO_EVENTS_PHRASES: &[&str] = &[
    "How about using the day to catch up on your tasks?",
    "A free day is a chance to innovate and create!",
    "No meetings today? Perfect for focusing on important projects!",
    "Your calendar is clear today. A good moment to plan your next steps.",
    "A day without commitments! A great chance to learn something new.",
];

pub const GREETING_EMOJIS: &[&str] = &["🌞", "🌻", "☀️", "🌅", "🌄", "🌹", "🌈", "✨"];
pub const MEETING_EMOJIS: &[&str] = &["📅", "🗓️", "📊", "👥", "💼", "🤝", "📌", "🔔"];
pub const FREE_DAY_EMOJIS: &[&str] = &["🏖️", "🎯", "📚", "💡", "🧠", "🚀", "🔍", "📝"];
