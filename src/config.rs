//! # Configuration Management
//!
//! Centralized configuration for the rewriting engine.
//!
//! The engine itself only consumes two knobs at runtime (diagnostic verbosity and
//! tracker sizing); the logging section is read by
//! [`init_logging`](crate::utils::logging::init_logging) for hosts that let this
//! crate install their subscriber.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()` / `from_toml()`
//! - Environment variables via `from_env()`
//! - Direct instantiation with defaults

use crate::error::{Result, RewriteError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Initial capacity of a fresh per-connection entity tracker
pub const DEFAULT_TRACKER_CAPACITY: usize = 64;

/// Live-record count past which a tracker warns about missed destroy packets
pub const DEFAULT_TRACKER_WARN_THRESHOLD: usize = 10_000;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RewriterConfig {
    /// Per-item failure reporting
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    /// Per-connection entity tracker sizing
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RewriterConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| RewriteError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| RewriteError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| RewriteError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(verbose) = std::env::var("ENTITY_REWRITER_VERBOSE") {
            config.diagnostics.verbose = parse_flag("ENTITY_REWRITER_VERBOSE", &verbose)?;
        }

        if let Ok(full) = std::env::var("ENTITY_REWRITER_LOG_FULL_BATCH") {
            config.diagnostics.log_full_batch = parse_flag("ENTITY_REWRITER_LOG_FULL_BATCH", &full)?;
        }

        if let Ok(level) = std::env::var("ENTITY_REWRITER_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                RewriteError::ConfigError(format!("Invalid log level: {level}"))
            })?;
        }

        if let Ok(capacity) = std::env::var("ENTITY_REWRITER_TRACKER_CAPACITY") {
            if let Ok(val) = capacity.parse::<usize>() {
                config.tracker.initial_capacity = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RewriteError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| RewriteError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.diagnostics.validate());
        errors.extend(self.tracker.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RewriteError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RewriteError::ConfigError(format!(
            "Invalid boolean for {name}: '{raw}'"
        ))),
    }
}

/// Per-item failure reporting
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Report every omitted item through the diagnostic sink
    pub verbose: bool,

    /// Also log the whole input batch when an item fails (requires `verbose`)
    pub log_full_batch: bool,
}

impl DiagnosticsConfig {
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            log_full_batch: false,
        }
    }

    /// Validate diagnostics configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.log_full_batch && !self.verbose {
            errors.push("log_full_batch has no effect unless verbose is enabled".to_string());
        }
        errors
    }
}

/// Per-connection entity tracker sizing
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Records preallocated per tracker
    pub initial_capacity: usize,

    /// Live-record count that triggers a one-time warning
    pub warn_threshold: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_TRACKER_CAPACITY,
            warn_threshold: DEFAULT_TRACKER_WARN_THRESHOLD,
        }
    }
}

impl TrackerConfig {
    /// Validate tracker configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.initial_capacity > 1_000_000 {
            errors.push(format!(
                "Tracker initial capacity too large: {} (max recommended: 1,000,000)",
                self.initial_capacity
            ));
        }

        if self.warn_threshold == 0 {
            errors.push("Tracker warn threshold must be greater than 0".to_string());
        } else if self.warn_threshold < self.initial_capacity {
            errors.push(format!(
                "Tracker warn threshold ({}) is below the initial capacity ({})",
                self.warn_threshold, self.initial_capacity
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("entity-rewriter"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert!(parse_flag("X", "TRUE").unwrap());
        assert!(parse_flag("X", " on ").unwrap());
        assert!(!parse_flag("X", "0").unwrap());
        assert!(parse_flag("X", "maybe").is_err());
    }

    #[test]
    fn test_example_config_parses_back() {
        let text = RewriterConfig::example_config();
        let parsed = RewriterConfig::from_toml(&text).unwrap();
        assert!(!parsed.diagnostics.verbose);
        assert_eq!(parsed.tracker.initial_capacity, DEFAULT_TRACKER_CAPACITY);
    }
}
