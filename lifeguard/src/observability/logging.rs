//! Subscriber installation.

use crate::config::LoggingConfig;
use crate::errors::LifeguardError;
use tracing_subscriber::EnvFilter;

/// Builds the filter for a logging configuration.
///
/// # Errors
///
/// Returns `LifeguardError::Config` for an unparsable directive.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, LifeguardError> {
    EnvFilter::try_new(&config.level)
        .map_err(|e| LifeguardError::Config(format!("invalid log filter '{}': {e}", config.level)))
}

/// Installs a global `tracing` subscriber.
///
/// # Errors
///
/// Returns `LifeguardError::Config` if the filter is invalid or a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LifeguardError> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| LifeguardError::Config(format!("failed to install subscriber: {e}")))
}
