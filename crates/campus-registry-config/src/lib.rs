// crates/campus-registry-config/src/lib.rs
// ============================================================================
// Module: Campus Registry Config
// Description: Canonical configuration model and validation.
// Purpose: Load and validate the database and backup settings consumed at
//          startup.
// Dependencies: campus-registry-engine, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! The recognized runtime options are the database locator (path plus
//! pragmas) and the backup artifact path; nothing else is part of this
//! core. Configuration is TOML, deserialized into the engine's settings
//! types and validated before any connection is opened. There is no
//! credential anywhere: the database is embedded and the backup runs
//! in-process.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use campus_registry_engine::BackupSettings;
use campus_registry_engine::DatabaseSettings;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config: {0}")]
    Io(String),
    /// The configuration file could not be parsed.
    #[error("cannot parse config: {0}")]
    Parse(String),
    /// The configuration is structurally valid but semantically wrong.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Model
// ============================================================================

/// Root configuration for the campus registry.
///
/// # Invariants
/// - `database.path` and `backup.path` are distinct file paths.
/// - `database.busy_timeout_ms` is greater than zero.
#[derive(Debug, Clone, Deserialize)]
pub struct CampusConfig {
    /// Database connection settings.
    pub database: DatabaseSettings,
    /// Backup artifact settings.
    #[serde(default)]
    pub backup: BackupSettings,
}

impl CampusConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        Self::from_toml_str(&raw)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the semantic invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".to_string()));
        }
        if self.database.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "database.busy_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.backup.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("backup.path must not be empty".to_string()));
        }
        if self.backup.path == self.database.path {
            return Err(ConfigError::Invalid(
                "backup.path must differ from database.path".to_string(),
            ));
        }
        Ok(())
    }
}
