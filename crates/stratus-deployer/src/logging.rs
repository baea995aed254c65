//! Tracing setup for the deployer: compact events on stderr plus a plain-text log file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "app.log";

/// Level selected by the number of `-v` flags.
#[must_use]
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Default filter: our crates at `level`, everything else at `warn`.
#[must_use]
pub fn default_directives(level: Level) -> String {
    let level = level.to_string().to_lowercase();
    format!(
        "warn,stratus_deployer={level},stratus_core={level},stratus_resources={level},\
         stratus_network={level},stratus_compute={level}"
    )
}

/// Install the global subscriber. `RUST_LOG` overrides the verbosity flags.
///
/// # Errors
///
/// Fails if the log file cannot be opened or a subscriber is already installed.
pub fn init(verbosity: u8, log_file: &Path) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level_for(verbosity))));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(verbosity >= 2)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}
