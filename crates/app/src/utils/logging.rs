//! Subscriber setup and run summaries.

use std::io;
use std::path::Path;

use anyhow::{anyhow, Context};
use daybrief_domain::{LogFormat, LoggingConfig, MemberStatus, RunReport};
use tracing::{error, info, warn, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const FALLBACK_LEVEL: &str = "info";

/// Install the global subscriber.
///
/// Logs go to stderr, and additionally to `config.file` when set. The
/// returned guard flushes the file writer on drop; hold it until exit.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), &config.level);

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            (Some(format_layer(config.format, writer, false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(format_layer(config.format, io::stderr, true))
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow!("global subscriber already installed: {err}"))?;

    Ok(guard)
}

/// `RUST_LOG` wins when it parses, then the configured level, then `info`.
pub fn build_filter(rust_log: Option<&str>, configured: &str) -> EnvFilter {
    rust_log
        .filter(|directive| !directive.trim().is_empty())
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new(FALLBACK_LEVEL))
}

fn format_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => fmt::layer().with_ansi(ansi).with_writer(writer).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    }
}

/// Append-only writer for `path`. Missing parent directories are created.
pub fn file_appender(path: &Path) -> anyhow::Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("log file path has no file name: {}", path.display()))?;
    let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// One line per member plus the totals.
pub fn log_run_report(report: &RunReport) {
    if let Some(reason) = &report.fatal {
        error!(run_id = %report.run_id, reason = %reason, "Run did not process any member");
        return;
    }

    for member in &report.members {
        let status = member.status();
        if status == MemberStatus::Delivered {
            info!(member_id = %member.member_id, name = %member.display_name, %status, "Member done");
        } else {
            warn!(
                member_id = %member.member_id,
                name = %member.display_name,
                %status,
                escalated = member.escalated,
                "Member done"
            );
        }
    }

    let elapsed_ms = report
        .finished_at
        .map(|finished| (finished - report.started_at).num_milliseconds())
        .unwrap_or_default();
    info!(
        run_id = %report.run_id,
        members = report.members.len(),
        delivered = report.delivered(),
        failed = report.failed(),
        skipped = report.skipped.len(),
        elapsed_ms,
        "Run summary"
    );
}
