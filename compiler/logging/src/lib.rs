#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging setup for the compiler.
//!
//! Installs a global `tracing` subscriber writing to stderr. The level comes
//! from configuration; `RUST_LOG` overrides it when set.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The level or filter directive could not be parsed.
    #[error("invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// Offending directive
        directive: String,
        /// Parser message
        reason: String,
    },
    /// A global subscriber is already installed.
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Build the filter for `level`, letting `RUST_LOG` take precedence.
pub fn env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter {
        directive: level.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber.
///
/// `json` switches the output to one JSON object per event.
pub fn init(level: &str, json: bool) -> Result<(), LoggingError> {
    let filter = env_filter(level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = if json { builder.json().try_init() } else { builder.with_target(false).try_init() };
    result.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;
    tracing::debug!("logging initialized at level {}", level);
    Ok(())
}
