//! Daybrief - daily calendar digest
//!
//! One batch per invocation: load configuration, deliver every member's
//! digest, report, exit.

use std::process::ExitCode;

use anyhow::Context;
use daybrief_infra::config;
use daybrief_lib::utils::logging::{init_logging, log_run_report};
use daybrief_lib::{escalate_configuration_error, exit_status, AppContext, EXIT_CONFIG_ERROR};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // .env must be in the environment before the loader reads DAYBRIEF_*
    let dotenv = dotenvy::dotenv();
    let loaded = config::load();

    let logging = loaded.as_ref().map(|config| config.logging.clone()).unwrap_or_default();
    let _log_guard = init_logging(&logging).context("failed to initialise logging")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) => debug!(error = %err, "No .env file loaded"),
    }

    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Could not load configuration");
            return Ok(ExitCode::from(EXIT_CONFIG_ERROR));
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "Daybrief starting");

    if let Err(err) = config.validate() {
        error!(error = %err, "Configuration rejected; run not started");
        escalate_configuration_error(&config.admin, &err).await;
        return Ok(ExitCode::from(EXIT_CONFIG_ERROR));
    }

    let admin = config.admin.clone();
    let ctx = match AppContext::new(config) {
        Ok(ctx) => ctx,
        Err(err) => {
            error!(error = %err, "Could not wire the application");
            escalate_configuration_error(&admin, &err).await;
            return Ok(ExitCode::from(EXIT_CONFIG_ERROR));
        }
    };

    let report = ctx.run().await;
    log_run_report(&report);

    Ok(ExitCode::from(exit_status(&report)))
}
