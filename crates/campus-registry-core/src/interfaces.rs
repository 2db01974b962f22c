// crates/campus-registry-core/src/interfaces.rs
// ============================================================================
// Module: Campus Registry Interfaces
// Description: Backend-agnostic error taxonomy and trait seams.
// Purpose: Define the contract surfaces between the engine and its
//          collaborators.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every database-originated failure is caught at the call that produced it
//! and surfaced through one of the error classes here; none propagate past
//! a component boundary uncaught. Mutation failures carry the underlying
//! database message verbatim so trigger-raised validation is visible to the
//! collaborator. Read, backup, and bootstrap failures degrade rather than
//! crash.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Error Taxonomy
// ============================================================================

/// The database connection could not be established or maintained.
///
/// Fatal at startup by caller policy; non-fatal but surfaced thereafter.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone)]
pub enum ConnectivityError {
    /// The database could not be opened.
    #[error("cannot open database: {0}")]
    Open(String),
    /// The connection is unusable (e.g. poisoned lock).
    #[error("database connection unavailable: {0}")]
    Unavailable(String),
}

/// A mutation was rejected by the database.
///
/// Covers constraint violations, trigger-raised validation, and type
/// mismatches. No partial commit occurs and no retry is attempted.
///
/// # Invariants
/// - `Rejected` carries the underlying database message verbatim.
#[derive(Debug, Error, Clone)]
pub enum MutationError {
    /// The target entity has no descriptor.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
    /// The record does not match the descriptor's column list.
    #[error("record shape invalid: {0}")]
    InvalidRecord(String),
    /// The database rejected the statement.
    #[error("{0}")]
    Rejected(String),
    /// The connection failed mid-operation.
    #[error("database connection unavailable: {0}")]
    Connectivity(String),
}

/// A read failed; degrades to an empty result set plus a status message.
///
/// # Invariants
/// - Never raised as a hard failure by the engine's fetch surface.
#[derive(Debug, Error, Clone)]
pub enum FetchError {
    /// The database query failed.
    #[error("fetch failed: {0}")]
    Query(String),
}

/// A server-side routine invocation failed.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone)]
pub enum RoutineError {
    /// No routine with the requested name is installed.
    #[error("unknown routine: {0}")]
    UnknownRoutine(String),
    /// The catalog entry could not be decoded.
    #[error("routine catalog invalid: {0}")]
    Catalog(String),
    /// The supplied parameter count does not match the routine signature.
    #[error("routine {name} expects {expected} parameters, got {actual}")]
    ParameterMismatch {
        /// Routine name.
        name: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied parameter count.
        actual: usize,
    },
    /// The database rejected the invocation.
    #[error("routine invocation failed: {0}")]
    Invocation(String),
}

/// A server-side object failed to (re)install during bootstrap.
///
/// Logged and surfaced in the bootstrap report; never fatal.
///
/// # Invariants
/// - `object` names the database object that failed to install.
#[derive(Debug, Error, Clone)]
#[error("bootstrap of {object} failed: {message}")]
pub struct BootstrapError {
    /// Name of the object that failed to install.
    pub object: String,
    /// Underlying database message.
    pub message: String,
}

/// The backup side effect failed.
///
/// Logged only; never propagated past the engine, never retried.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone)]
pub enum BackupError {
    /// The export could not be produced.
    #[error("backup failed: {0}")]
    Export(String),
}

// ============================================================================
// SECTION: Backup Sink
// ============================================================================

/// Destination for the post-commit full-database export.
///
/// Implementations overwrite a single fixed-path artifact and must never
/// place a credential on a process command line. The engine invokes the
/// sink only after a mutation's commit has already succeeded, so a backup
/// failure can never lose a committed record.
pub trait BackupSink: Send + Sync {
    /// Attempts one full-database export, overwriting the prior artifact.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError`] when the export fails; callers log and
    /// continue.
    fn attempt(&self) -> Result<(), BackupError>;
}
