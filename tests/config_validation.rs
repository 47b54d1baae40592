//! Integration tests for configuration validation

#![allow(clippy::expect_used)]

use entity_rewriter::config::{DiagnosticsConfig, LoggingConfig, RewriterConfig, TrackerConfig};
use tracing::Level;

#[test]
fn test_default_config_validates() {
    let config = RewriterConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
}

#[test]
fn test_full_batch_without_verbose() {
    let mut config = RewriterConfig::default();
    config.diagnostics = DiagnosticsConfig {
        verbose: false,
        log_full_batch: true,
    };

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("log_full_batch has no effect")));
}

#[test]
fn test_zero_warn_threshold() {
    let mut config = RewriterConfig::default();
    config.tracker.warn_threshold = 0;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("warn threshold must be greater than 0")));
}

#[test]
fn test_warn_threshold_below_capacity() {
    let config = RewriterConfig::default_with_overrides(|c| {
        c.tracker = TrackerConfig {
            initial_capacity: 512,
            warn_threshold: 100,
        };
    });

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("below the initial capacity")));
}

#[test]
fn test_excessive_tracker_capacity() {
    let mut config = RewriterConfig::default();
    config.tracker.initial_capacity = 2_000_000;
    config.tracker.warn_threshold = 3_000_000;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Tracker initial capacity too large")));
}

#[test]
fn test_empty_app_name() {
    let mut config = RewriterConfig::default();
    config.logging.app_name = String::new();

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("cannot be empty")));
}

#[test]
fn test_file_logging_without_path() {
    let mut config = RewriterConfig::default();
    config.logging.log_to_file = true;
    config.logging.log_file_path = None;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("log_file_path must be specified")));
}

#[test]
fn test_no_logging_output() {
    let config = RewriterConfig::default_with_overrides(|c| {
        c.logging = LoggingConfig {
            log_to_console: false,
            log_to_file: false,
            ..LoggingConfig::default()
        };
    });

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("At least one logging output")));
}

#[test]
fn test_validate_strict_collects_every_error() {
    let mut config = RewriterConfig::default();
    config.tracker.warn_threshold = 0;
    config.logging.app_name = String::new();

    let err = config
        .validate_strict()
        .expect_err("invalid config must be rejected");
    let msg = err.to_string();
    assert!(msg.contains("warn threshold"));
    assert!(msg.contains("Application name"));
}

#[test]
fn test_from_toml_partial_sections() {
    let config = RewriterConfig::from_toml(
        r#"
        [diagnostics]
        verbose = true

        [logging]
        app_name = "bridge"
        log_level = "debug"
        log_to_console = true
        log_to_file = false
        json_format = true
        "#,
    )
    .expect("valid TOML");

    assert!(config.diagnostics.verbose);
    assert!(!config.diagnostics.log_full_batch);
    assert_eq!(config.logging.log_level, Level::DEBUG);
    assert_eq!(config.tracker.warn_threshold, TrackerConfig::default().warn_threshold);
}

#[test]
fn test_from_toml_partial_fields_fall_back_to_defaults() {
    let config = RewriterConfig::from_toml(
        r#"
        [diagnostics]
        log_full_batch = true

        [tracker]
        warn_threshold = 5
        "#,
    )
    .expect("partial sections must parse");

    assert!(!config.diagnostics.verbose);
    assert!(config.diagnostics.log_full_batch);
    assert_eq!(config.tracker.warn_threshold, 5);
    assert_eq!(
        config.tracker.initial_capacity,
        TrackerConfig::default().initial_capacity
    );
}

#[test]
fn test_from_toml_rejects_bad_level() {
    let result = RewriterConfig::from_toml(
        r#"
        [logging]
        app_name = "bridge"
        log_level = "loud"
        log_to_console = true
        log_to_file = false
        json_format = false
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rewriter.toml");

    let config = RewriterConfig::default_with_overrides(|c| {
        c.diagnostics.verbose = true;
        c.tracker.initial_capacity = 128;
    });
    config.save_to_file(&path).expect("save");

    let loaded = RewriterConfig::from_file(&path).expect("load");
    assert!(loaded.diagnostics.verbose);
    assert_eq!(loaded.tracker.initial_capacity, 128);
}

#[test]
fn test_missing_file_is_config_error() {
    let result = RewriterConfig::from_file("/definitely/not/here.toml");
    assert!(matches!(
        result,
        Err(entity_rewriter::RewriteError::ConfigError(_))
    ));
}
