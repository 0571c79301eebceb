// textstore - whole-file write, line reading and pattern replacement over a
// single text file
//
// `store` holds the file operations, `error` the error type they share, and
// `config` the optional logging settings read by the binary.

pub mod config;
pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{FileTextStore, Lines, ReplaceOutcome};

use anyhow::Result;
use std::sync::Once;
use tracing::debug;

use crate::config::LoggingConfig;

static LOGGING_INIT: Once = Once::new();

/// Crate version, as declared in Cargo.toml
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Initialize logging with default settings
pub fn init() -> Result<()> {
    init_with_logger(&LoggingConfig::default())
}

/// Initialize the global tracing subscriber
///
/// Logs go to stderr so stdout only carries file contents. RUST_LOG, when
/// set, takes precedence over `config.level`. Calls after the first are no-ops.
pub fn init_with_logger(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let mut init_result = Ok(());

    LOGGING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        init_result = fmt::Subscriber::builder()
            .with_ansi(config.ansi)
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(config.target)
            .without_time()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e));

        if init_result.is_ok() {
            debug!("Initialized textstore v{}", version());
        }
    });

    init_result
}
