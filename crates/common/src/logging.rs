//! Tracing setup.
//!
//! Initialization is driven by [`LoggingConfig`]: level directives, JSON
//! output for structured collection, and an optional log file. The
//! `ANNOCAM_LOG` environment variable overrides the configured directives.

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Filter for a config: `ANNOCAM_LOG` wins when set, otherwise the
/// configured level string is parsed as filter directives.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_env("ANNOCAM_LOG").unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Open the configured log file for appending. Falls back to stderr
/// output (with a note there) when the file cannot be opened, so a bad
/// path never silences the session log.
fn log_file(config: &LoggingConfig) -> Option<std::fs::File> {
    let path = config.file.as_ref()?;
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("annocam: cannot open log file {}: {e}", path.display());
            None
        }
    }
}

/// Install the global tracing subscriber for this process.
///
/// Calling again (tests, embedders re-opening sessions) keeps the first
/// subscriber and is not an error.
pub fn init_logging(config: &LoggingConfig) {
    let filter = env_filter(config);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let _ = match (log_file(config), config.json) {
        (Some(file), true) => builder
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .json()
            .try_init(),
        (Some(file), false) => builder
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };
}

/// Initialize logging with defaults (tests, quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}
