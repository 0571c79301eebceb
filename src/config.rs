//! Optional `textstore.toml` settings.
//!
//! Only logging is configurable. The demo file path and its content are
//! fixed in the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Name of the optional configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "textstore.toml";

/// Process configuration for textstore
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by RUST_LOG
    pub level: String,
    /// Whether to use ANSI colors in log output
    pub ansi: bool,
    /// Whether to include the module target in log lines
    pub target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            ansi: false,
            target: false,
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration: {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        debug!("Loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Load configuration from `path`, never failing.
    ///
    /// An unreadable or malformed file yields the defaults together with the
    /// error, so the caller can report it once logging is up.
    pub fn load_or_fallback(path: impl AsRef<Path>) -> (Self, Option<anyhow::Error>) {
        match Self::load(path).context("Failed to load configuration") {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// `load_or_fallback` for `textstore.toml` in the current directory
    pub fn load_default_or_fallback() -> (Self, Option<anyhow::Error>) {
        Self::load_or_fallback(CONFIG_FILE_NAME)
    }
}
