//! Configuration file support
//!
//! Every field has a default, so an absent file and an empty file behave
//! the same. Example:
//!
//! ```toml
//! [log]
//! level = "debug"
//! format = "json"
//!
//! [server]
//! max_nesting_depth = 16
//! call_timeout_ms = 2000
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Highest accepted `server.max_nesting_depth`.
///
/// `serde_json` stops at 128 nested JSON levels, and the typed encoding of a
/// list or map spends three of them per value level. Any argument within
/// this depth still decodes, so the depth check reports the real cause.
pub const MAX_NESTING_DEPTH: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log: LogConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Arguments nested deeper than this are rejected before merging
    pub max_nesting_depth: usize,
    /// Deadline for a single call; no deadline when unset
    pub call_timeout_ms: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: MAX_NESTING_DEPTH,
            call_timeout_ms: None,
        }
    }
}

impl ServerConfig {
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_nesting_depth > MAX_NESTING_DEPTH {
            anyhow::bail!(
                "server.max_nesting_depth is {}, at most {} is supported",
                self.max_nesting_depth,
                MAX_NESTING_DEPTH
            );
        }
        Ok(())
    }
}

impl Config {
    /// Load from `path`, or fall back to the defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file: {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.server.validate()?;
        Ok(config)
    }
}
