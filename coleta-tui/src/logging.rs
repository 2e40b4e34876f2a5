//! Log file setup; the terminal itself belongs to the UI.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Install the global subscriber writing to the configured file.
///
/// `RUST_LOG` takes precedence over the configured level.
pub(crate) fn init(config: &LogConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .with_context(|| format!("cannot open log file {}", config.file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_err| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_err| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("cannot install log subscriber: {err}"))
}
