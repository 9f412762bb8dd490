//! Tracing subscriber setup for the binary.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Where log lines go.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Standard error, for one-shot commands.
    Stderr,
    /// Append to a file, for the terminal UI which owns the screen.
    File(&'a Path),
}

/// Installs the global tracing subscriber.
///
/// `filter` uses `EnvFilter` directive syntax, e.g. `warn` or
/// `notekeep=debug`.
///
/// # Errors
///
/// Returns an error if the filter does not parse, the log file cannot be
/// opened, or a subscriber is already installed.
pub fn init(filter: &str, target: LogTarget<'_>) -> Result<()> {
    let env_filter =
        EnvFilter::try_new(filter).with_context(|| format!("invalid log filter '{filter}'"))?;
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    let installed = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
