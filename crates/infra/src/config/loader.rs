//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Start from a file: the path in `DAYBRIEF_CONFIG`, else the first existing
//!    candidate, else [`DigestConfig::default`]
//! 2. Overlay `DAYBRIEF_*` environment variables
//! 3. Supports JSON and TOML formats (by file extension)
//!
//! `.env` files are read by the binary before this runs, so their values
//! arrive here as ordinary environment variables.
//!
//! ## Environment Variables
//! - `DAYBRIEF_TENANT_ID`, `DAYBRIEF_CLIENT_ID`, `DAYBRIEF_CLIENT_SECRET`
//! - `DAYBRIEF_SENDER`: mailbox used for mail and chat
//! - `DAYBRIEF_ADMIN_EMAIL`: escalation recipient
//! - `DAYBRIEF_SMTP_HOST`, `DAYBRIEF_SMTP_PORT`, `DAYBRIEF_SMTP_USERNAME`,
//!   `DAYBRIEF_SMTP_PASSWORD`, `DAYBRIEF_SMTP_FROM`
//! - `DAYBRIEF_TIMEZONE`, `DAYBRIEF_WORK_START`, `DAYBRIEF_WORK_END`,
//!   `DAYBRIEF_MIN_FOCUS_MINUTES`, `DAYBRIEF_ALL_DAY_POLICY`
//! - `DAYBRIEF_CHANNELS` (comma separated), `DAYBRIEF_MAX_CONCURRENCY`,
//!   `DAYBRIEF_FILE_DROP_FOLDER`
//! - `DAYBRIEF_GRAPH_BASE_URL`, `DAYBRIEF_LOGIN_BASE_URL`
//! - `DAYBRIEF_MAX_ATTEMPTS`, `DAYBRIEF_REQUEST_TIMEOUT_SECS`
//! - `DAYBRIEF_LOG_LEVEL`, `DAYBRIEF_LOG_FORMAT`, `DAYBRIEF_LOG_FILE`
//!
//! ## File Locations
//! The loader checks the following paths (in order):
//! 1. `./daybrief.toml`, `./daybrief.json`, `./config.toml`, `./config.json`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use daybrief_domain::constants::CONFIG_PATH_ENV;
use daybrief_domain::{parse_clock_time, ChannelKind, DigestConfig, DigestError, Result};

const FILE_NAMES: [&str; 4] = ["daybrief.toml", "daybrief.json", "config.toml", "config.json"];

/// Load configuration: file (or defaults), then environment overrides.
///
/// # Errors
/// Returns `DigestError::Config` if an explicit file is missing or invalid, or
/// an environment value does not parse. Completeness is checked separately by
/// [`DigestConfig::validate`].
pub fn load() -> Result<DigestConfig> {
    let explicit = std::env::var(CONFIG_PATH_ENV).ok().filter(|p| !p.trim().is_empty());

    let mut config = match explicit.map(PathBuf::from).or_else(find_config_file) {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, starting from defaults");
            DigestConfig::default()
        }
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations.
///
/// # Errors
/// Returns `DigestError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<DigestConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DigestError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            DigestError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DigestError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<DigestConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DigestError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DigestError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DigestError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Search the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_file() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

/// Overlay `DAYBRIEF_*` values from `lookup` onto `config`.
///
/// Blank values are ignored.
pub fn apply_overrides<F>(config: &mut DigestConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    // Credentials and endpoints
    if let Some(v) = get("DAYBRIEF_TENANT_ID") {
        config.credentials.tenant_id = v;
    }
    if let Some(v) = get("DAYBRIEF_CLIENT_ID") {
        config.credentials.client_id = v;
    }
    if let Some(v) = get("DAYBRIEF_CLIENT_SECRET") {
        config.credentials.client_secret = v;
    }
    if let Some(v) = get("DAYBRIEF_GRAPH_BASE_URL") {
        config.endpoints.graph_base_url = v;
    }
    if let Some(v) = get("DAYBRIEF_LOGIN_BASE_URL") {
        config.endpoints.login_base_url = v;
    }
    if let Some(v) = get("DAYBRIEF_SENDER") {
        config.sender = Some(v);
    }

    // Escalation
    if let Some(v) = get("DAYBRIEF_ADMIN_EMAIL") {
        config.admin.email = Some(v);
    }
    let smtp_keys = [
        "DAYBRIEF_SMTP_HOST",
        "DAYBRIEF_SMTP_PORT",
        "DAYBRIEF_SMTP_USERNAME",
        "DAYBRIEF_SMTP_PASSWORD",
        "DAYBRIEF_SMTP_FROM",
    ];
    if smtp_keys.into_iter().any(|key| get(key).is_some()) {
        let smtp = config.admin.smtp.get_or_insert_with(Default::default);
        if let Some(v) = get("DAYBRIEF_SMTP_HOST") {
            smtp.host = v;
        }
        if let Some(v) = parsed(&get, "DAYBRIEF_SMTP_PORT")? {
            smtp.port = v;
        }
        if let Some(v) = get("DAYBRIEF_SMTP_USERNAME") {
            smtp.username = v;
        }
        if let Some(v) = get("DAYBRIEF_SMTP_PASSWORD") {
            smtp.password = v;
        }
        if let Some(v) = get("DAYBRIEF_SMTP_FROM") {
            smtp.from = Some(v);
        }
    }

    // Schedule analysis
    if let Some(v) = get("DAYBRIEF_TIMEZONE") {
        config.schedule.timezone = v;
    }
    if let Some(v) = get("DAYBRIEF_WORK_START") {
        config.schedule.work_start = parse_clock_time(&v)?;
    }
    if let Some(v) = get("DAYBRIEF_WORK_END") {
        config.schedule.work_end = parse_clock_time(&v)?;
    }
    if let Some(v) = parsed(&get, "DAYBRIEF_MIN_FOCUS_MINUTES")? {
        config.schedule.min_focus_minutes = v;
    }
    if let Some(v) = keyword(&get, "DAYBRIEF_ALL_DAY_POLICY")? {
        config.schedule.all_day_policy = v;
    }

    // Delivery
    if let Some(v) = get("DAYBRIEF_CHANNELS") {
        config.delivery.channels = parse_channels(&v)?;
    }
    if let Some(v) = parsed(&get, "DAYBRIEF_MAX_CONCURRENCY")? {
        config.delivery.max_concurrency = v;
    }
    if let Some(v) = get("DAYBRIEF_FILE_DROP_FOLDER") {
        config.delivery.file_drop_folder = v;
    }

    // Call guard
    if let Some(v) = parsed(&get, "DAYBRIEF_MAX_ATTEMPTS")? {
        config.retry.max_attempts = v;
    }
    if let Some(v) = parsed(&get, "DAYBRIEF_REQUEST_TIMEOUT_SECS")? {
        config.retry.request_timeout_secs = v;
    }

    // Logging
    if let Some(v) = get("DAYBRIEF_LOG_LEVEL") {
        config.logging.level = v;
    }
    if let Some(v) = keyword(&get, "DAYBRIEF_LOG_FORMAT")? {
        config.logging.format = v;
    }
    if let Some(v) = get("DAYBRIEF_LOG_FILE") {
        config.logging.file = Some(PathBuf::from(v));
    }

    Ok(())
}

/// Parse a numeric variable.
fn parsed<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| DigestError::Config(format!("Invalid value for {key} ('{raw}'): {e}")))
        })
        .transpose()
}

/// Parse a keyword variable (policy, format).
fn keyword<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| raw.parse::<T>().map_err(|e| DigestError::Config(format!("{key}: {e}"))))
        .transpose()
}

fn parse_channels(raw: &str) -> Result<Vec<ChannelKind>> {
    let mut channels = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let kind = name
            .parse::<ChannelKind>()
            .map_err(|e| DigestError::Config(format!("DAYBRIEF_CHANNELS: {e}")))?;
        if !channels.contains(&kind) {
            channels.push(kind);
        }
    }
    Ok(channels)
}
