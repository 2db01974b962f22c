// crates/campus-registry-config/tests/config_validation.rs
// ============================================================================
// Module: Configuration Unit Tests
// Description: Targeted tests for config loading and validation.
// Purpose: Validate TOML parsing, defaulting, and the semantic checks run
//          before any connection is opened.
// ============================================================================

//! ## Overview
//! Unit-level tests for the configuration contracts:
//! - Minimal TOML parses with defaults applied
//! - File loading goes through the same parse-then-validate path
//! - Each semantic invariant rejects with a named reason

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    missing_docs,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::path::PathBuf;

use campus_registry_config::CampusConfig;
use campus_registry_config::ConfigError;
use campus_registry_engine::SqliteJournalMode;
use campus_registry_engine::SqliteSyncMode;
use tempfile::TempDir;

// ============================================================================
// SECTION: Parsing and Defaults
// ============================================================================

#[test]
fn minimal_config_applies_defaults() {
    let config = CampusConfig::from_toml_str(
        r#"
[database]
path = "campus.db3"
"#,
    )
    .expect("parse");

    assert_eq!(config.database.path, PathBuf::from("campus.db3"));
    assert_eq!(config.database.busy_timeout_ms, 5_000);
    assert_eq!(config.database.journal_mode, SqliteJournalMode::Wal);
    assert_eq!(config.database.sync_mode, SqliteSyncMode::Full);
    assert_eq!(config.backup.path, PathBuf::from("campus_registry_backup.db3"));
}

#[test]
fn full_config_overrides_every_default() {
    let config = CampusConfig::from_toml_str(
        r#"
[database]
path = "data/campus.db3"
busy_timeout_ms = 250
journal_mode = "delete"
sync_mode = "normal"

[backup]
path = "backups/campus.db3"
"#,
    )
    .expect("parse");

    assert_eq!(config.database.busy_timeout_ms, 250);
    assert_eq!(config.database.journal_mode, SqliteJournalMode::Delete);
    assert_eq!(config.database.sync_mode, SqliteSyncMode::Normal);
    assert_eq!(config.backup.path, PathBuf::from("backups/campus.db3"));
}

#[test]
fn load_reads_parses_and_validates() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("campus.toml");
    std::fs::write(&path, "[database]\npath = \"campus.db3\"\n").expect("write config");

    let config = CampusConfig::load(&path).expect("load");
    assert_eq!(config.database.path, PathBuf::from("campus.db3"));

    let err = CampusConfig::load(&dir.path().join("missing.toml")).expect_err("missing file");
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = CampusConfig::from_toml_str("[database").expect_err("parse failure");
    assert!(matches!(err, ConfigError::Parse(_)));
}

// ============================================================================
// SECTION: Validation
// ============================================================================

#[test]
fn zero_busy_timeout_is_rejected() {
    let err = CampusConfig::from_toml_str(
        r#"
[database]
path = "campus.db3"
busy_timeout_ms = 0
"#,
    )
    .expect_err("zero timeout");
    assert!(matches!(err, ConfigError::Invalid(reason) if reason.contains("busy_timeout_ms")));
}

#[test]
fn empty_database_path_is_rejected() {
    let err = CampusConfig::from_toml_str(
        r#"
[database]
path = ""
"#,
    )
    .expect_err("empty path");
    assert!(matches!(err, ConfigError::Invalid(reason) if reason.contains("database.path")));
}

#[test]
fn backup_path_must_differ_from_database_path() {
    let err = CampusConfig::from_toml_str(
        r#"
[database]
path = "campus.db3"

[backup]
path = "campus.db3"
"#,
    )
    .expect_err("shared path");
    assert!(matches!(err, ConfigError::Invalid(reason) if reason.contains("differ")));
}
