// crates/campus-registry-engine/src/backup.rs
// ============================================================================
// Module: Backup Coordinator
// Description: Full-database export fired after successful mutations.
// Purpose: Overwrite a single fixed-path artifact, best effort, never
//          blocking or failing a committed mutation.
// Dependencies: campus-registry-core, rusqlite, serde
// ============================================================================

//! ## Overview
//! After every committed mutation the engine fires one backup attempt. The
//! coordinator snapshots the live database to the configured artifact path
//! with the `SQLite` online backup API, overwriting any prior artifact. No
//! versioning, no rotation, and no integrity check. No external command
//! line is spawned, so no credential can leak into a process list. The
//! artifact is never read by this system.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::sync::Arc;

use campus_registry_core::BackupError;
use campus_registry_core::BackupSink;
use rusqlite::MAIN_DB;
use serde::Deserialize;

use crate::client::DbClient;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Default artifact path, relative to the process working directory.
const DEFAULT_ARTIFACT_PATH: &str = "campus_registry_backup.db3";

/// Backup artifact settings.
///
/// # Invariants
/// - `path` is a single fixed artifact location, fully overwritten on each
///   successful mutation.
#[derive(Debug, Clone, Deserialize)]
pub struct BackupSettings {
    /// Artifact path.
    #[serde(default = "default_artifact_path")]
    pub path: PathBuf,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            path: default_artifact_path(),
        }
    }
}

/// Returns the default artifact path.
fn default_artifact_path() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACT_PATH)
}

// ============================================================================
// SECTION: Coordinator
// ============================================================================

/// Snapshots the live database to the fixed artifact path.
///
/// # Invariants
/// - Invoked only after a mutation's commit succeeded; a failed export can
///   at worst leave the artifact stale or missing, never lose a committed
///   record.
#[derive(Debug)]
pub struct SqliteBackupCoordinator {
    /// Injected database client.
    client: Arc<DbClient>,
    /// Fixed artifact path.
    artifact_path: PathBuf,
}

impl SqliteBackupCoordinator {
    /// Creates a coordinator writing to the configured artifact path.
    #[must_use]
    pub fn new(client: Arc<DbClient>, settings: &BackupSettings) -> Self {
        Self {
            client,
            artifact_path: settings.path.clone(),
        }
    }

    /// Returns the fixed artifact path.
    #[must_use]
    pub fn artifact_path(&self) -> &PathBuf {
        &self.artifact_path
    }
}

impl BackupSink for SqliteBackupCoordinator {
    fn attempt(&self) -> Result<(), BackupError> {
        if let Some(parent) = self.artifact_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|err| BackupError::Export(err.to_string()))?;
        }
        let guard = self
            .client
            .lock()
            .map_err(|err| BackupError::Export(err.to_string()))?;
        guard
            .backup(MAIN_DB, &self.artifact_path, None)
            .map_err(|err| BackupError::Export(err.to_string()))
    }
}
