//! Runtime configuration.
//!
//! Configuration is small: it only drives the logging setup. It can be
//! read from a JSON file or from environment variables.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the log filter directive.
pub const ENV_LOG: &str = "LIFEGUARD_LOG";

/// Environment variable switching JSON log output on (`1`, `true`, `yes`).
pub const ENV_LOG_JSON: &str = "LIFEGUARD_LOG_JSON";

fn default_level() -> String {
    "info".to_string()
}

/// Logging settings consumed by [`crate::observability::init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `"info"` or `"lifeguard=debug"`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Sets the filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Enables or disables JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeguardConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LifeguardConfig {
    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parses configuration from JSON text.
    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid lifeguard configuration")
    }

    /// Builds configuration from `LIFEGUARD_LOG` and `LIFEGUARD_LOG_JSON`.
    ///
    /// Unset variables keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(level) = lookup(ENV_LOG).filter(|l| !l.trim().is_empty()) {
            config.logging.level = level;
        }
        if let Some(json) = lookup(ENV_LOG_JSON) {
            config.logging.json = matches!(json.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = LifeguardConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = LifeguardConfig::from_json_str(r#"{"logging": {"json": true}}"#).unwrap();
        assert_eq!(
            config.logging,
            LoggingConfig::default().with_json(true)
        );

        let empty = LifeguardConfig::from_json_str("{}").unwrap();
        assert_eq!(empty, LifeguardConfig::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"logging": {{"level": "lifeguard=debug"}}}}"#).unwrap();

        let config = LifeguardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "lifeguard=debug");
    }

    #[test]
    fn test_from_file_errors_carry_context() {
        let err = LifeguardConfig::from_file("/nonexistent/lifeguard.json").unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = LifeguardConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn test_from_lookup() {
        let config = LifeguardConfig::from_lookup(|key| match key {
            ENV_LOG => Some("trace".to_string()),
            ENV_LOG_JSON => Some("TRUE".to_string()),
            _ => None,
        });
        assert_eq!(config.logging.level, "trace");
        assert!(config.logging.json);

        let config = LifeguardConfig::from_lookup(|_| None);
        assert_eq!(config, LifeguardConfig::default());
    }
}
