// crates/campus-registry-engine/src/client.rs
// ============================================================================
// Module: Database Client
// Description: Explicit owner of the single SQLite connection.
// Purpose: Open the database once at startup and serialize all access.
// Dependencies: campus-registry-core, rusqlite, serde
// ============================================================================

//! ## Overview
//! One [`DbClient`] is constructed from [`DatabaseSettings`] and injected
//! by reference into every component; no ambient connection state exists.
//! Its lifecycle is explicit: open at startup (fatal on failure, by caller
//! policy), dropped at shutdown. The connection is guarded by a mutex and
//! must be used by one logical operation at a time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use campus_registry_core::ConnectivityError;
use rusqlite::Connection;
use rusqlite::types::Value;
use serde::Deserialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteJournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteJournalMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Connection settings for the campus database.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds and is nonzero.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

/// Returns the default busy timeout for connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Explicit owner of the single campus database connection.
///
/// # Invariants
/// - Exactly one connection exists per client; access is serialized through
///   a mutex.
/// - No operation retries; every failure is surfaced once to the caller.
pub struct DbClient {
    /// The single shared connection.
    connection: Mutex<Connection>,
}

impl DbClient {
    /// Opens the campus database described by the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectivityError::Open`] when the file cannot be opened or
    /// the pragmas cannot be applied. Callers treat this as fatal at
    /// startup.
    pub fn open(settings: &DatabaseSettings) -> Result<Self, ConnectivityError> {
        ensure_parent_dir(&settings.path)?;
        let connection = Connection::open(&settings.path)
            .map_err(|err| ConnectivityError::Open(err.to_string()))?;
        connection
            .busy_timeout(Duration::from_millis(settings.busy_timeout_ms))
            .map_err(|err| ConnectivityError::Open(err.to_string()))?;
        connection
            .pragma_update(None, "journal_mode", settings.journal_mode.pragma_value())
            .map_err(|err| ConnectivityError::Open(err.to_string()))?;
        connection
            .pragma_update(None, "synchronous", settings.sync_mode.pragma_value())
            .map_err(|err| ConnectivityError::Open(err.to_string()))?;
        connection
            .pragma_update(None, "foreign_keys", "on")
            .map_err(|err| ConnectivityError::Open(err.to_string()))?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Acquires exclusive use of the connection.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectivityError::Unavailable`] when the guarding mutex is
    /// poisoned.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, ConnectivityError> {
        self.connection
            .lock()
            .map_err(|_| ConnectivityError::Unavailable("connection mutex poisoned".to_string()))
    }

    /// Executes a batch of semicolon-separated statements.
    ///
    /// Table provisioning is owned by an external collaborator; this is the
    /// raw surface it uses.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectivityError`] when the batch fails.
    pub fn batch(&self, sql: &str) -> Result<(), ConnectivityError> {
        let guard = self.lock()?;
        guard.execute_batch(sql).map_err(|err| ConnectivityError::Unavailable(err.to_string()))
    }
}

impl std::fmt::Debug for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbClient").finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Creates the parent directory of the database file when missing.
fn ensure_parent_dir(path: &Path) -> Result<(), ConnectivityError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| ConnectivityError::Open(err.to_string()))
}

/// Renders one stored value as the textual form surfaced to collaborators.
///
/// NULL stays `None`; everything else becomes text.
pub(crate) fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Integer(number) => Some(number.to_string()),
        Value::Real(number) => Some(number.to_string()),
        Value::Text(text) => Some(text.clone()),
        Value::Blob(bytes) => {
            Some(bytes.iter().map(|byte| format!("{byte:02x}")).collect::<String>())
        }
    }
}
