//! Tracing subscriber setup

use crate::config::{LogConfig, LogFormat};
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Logs go to stderr: stdout carries results and protocol responses.
/// `RUST_LOG` wins over `--debug`/`--verbose`, which win over the
/// configured level.
pub fn init(config: &LogConfig, format: Option<LogFormat>, verbose: bool, debug: bool) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level_directive(config, verbose, debug))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug); // Show target module in debug mode

    match format.unwrap_or(config.format) {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!(e))
}

fn level_directive(config: &LogConfig, verbose: bool, debug: bool) -> &str {
    if debug {
        "trace"
    } else if verbose {
        "debug"
    } else {
        &config.level
    }
}
