//! Integration tests for `logweave config` and the startup path of other commands.
//!
//! Tests config loading, validation and registry construction with real TOML files.

use std::fs;
use std::io::Cursor;

use tempfile::TempDir;

use logweave_cli::commands::config::{config_report, load_effective, validation_report};
use logweave_cli::commands::{build_registry, parse::parse_lines};

#[test]
fn test_config_validate_valid_toml() {
    // Given: A valid config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logweave.toml");

    let valid_config = r#"
[general]
log_level = "debug"
log_format = "pretty"

[parsing]
max_line_size = 65536
scanner_pool_size = 8
enabled_log_types = ["Apache.AccessCombined", "Zeek.DNS"]
"#;
    fs::write(&config_path, valid_config).expect("should write config");

    // When: Validating the config
    let report = validation_report(&config_path, true);

    // Then: Should be valid
    assert!(report.valid, "valid config should pass: {:?}", report.errors);
    assert!(report.errors.is_empty());
}

#[test]
fn test_config_validate_malformed_toml() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[general\nlog_level = \"info\"\n").expect("should write bad config");

    let report = validation_report(&config_path, true);

    assert!(!report.valid, "malformed TOML should fail validation");
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn test_config_validate_invalid_value() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logweave.toml");
    fs::write(&config_path, "[parsing]\nscanner_pool_size = 0\n").expect("should write config");

    let report = validation_report(&config_path, true);

    assert!(!report.valid);
    assert!(report.errors[0].contains("scanner_pool_size"));
}

#[test]
fn test_config_validate_unknown_log_type() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logweave.toml");
    fs::write(
        &config_path,
        "[parsing]\nenabled_log_types = [\"Zeek.DNS\", \"Zeek.HTTP\"]\n",
    )
    .expect("should write config");

    let report = validation_report(&config_path, true);

    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("Zeek.HTTP"));
}

#[test]
fn test_config_validate_missing_explicit_file() {
    let config_path = std::path::PathBuf::from("/nonexistent/logweave.toml");
    let report = validation_report(&config_path, true);
    assert!(!report.valid, "missing explicit file should fail");
}

#[test]
fn test_config_empty_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("empty.toml");
    fs::write(&config_path, "").expect("should write empty file");

    let config = load_effective(&config_path, true).expect("empty config should load");
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.parsing.scanner_pool_size, 64);
}

#[test]
fn test_config_show_reflects_file_values() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logweave.toml");
    fs::write(&config_path, "[parsing]\nmax_line_size = 4096\n").expect("should write config");

    let config = load_effective(&config_path, true).expect("load");
    let report = config_report(&config, &config_path, Some("parsing".to_owned())).expect("report");
    assert!(report.config_toml.contains("max_line_size = 4096"));
    assert_eq!(report.section.as_deref(), Some("parsing"));
}

#[test]
fn test_filtered_registry_parses_only_enabled_types() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("logweave.toml");
    fs::write(
        &config_path,
        "[parsing]\nenabled_log_types = [\"Apache.AccessCommon\"]\n",
    )
    .expect("should write config");

    let config = load_effective(&config_path, true).expect("load");
    let registry = build_registry(&config).expect("registry");
    assert_eq!(registry.names(), vec!["Apache.AccessCommon"]);
    assert!(registry.new_parser("Zeek.DNS").is_err());

    let mut parser = registry.new_parser("Apache.AccessCommon").expect("parser");
    let input = Cursor::new(
        r#"192.168.0.9 - - [10/Oct/2000:13:55:36 +0000] "GET / HTTP/1.1" 404 -"#.to_owned() + "\n",
    );
    let mut out = Vec::new();
    let summary = parse_lines(parser.as_mut(), input, &mut out, false).expect("parse");
    assert_eq!(summary.events, 1);

    let event: serde_json::Value =
        serde_json::from_slice(out.trim_ascii_end()).expect("one json line");
    assert_eq!(event["status"], 404);
    assert!(event.get("response_size").is_none() || event["response_size"].is_null());
    assert_eq!(event["lw_any_ip_addresses"], serde_json::json!(["192.168.0.9"]));
}
