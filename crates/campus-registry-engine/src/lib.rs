// crates/campus-registry-engine/src/lib.rs
// ============================================================================
// Module: Campus Registry Engine
// Description: SQLite-backed implementation of the record engine.
// Purpose: Provide CRUD, routine invocation, derived lookups, backup, and
//          bootstrap over a single injected connection.
// Dependencies: campus-registry-core, rusqlite, serde, tracing
// ============================================================================

//! ## Overview
//! This crate hosts the campus schema in an embedded `SQLite` database. One
//! [`DbClient`] owns the single mutex-guarded connection; the record engine,
//! stored-routine bridge, reference resolver, backup coordinator, and
//! bootstrap manager all borrow it by injection. All operations execute
//! synchronously and sequentially; result-set draining requires exclusive
//! use of the connection until complete.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod backup;
pub mod bootstrap;
pub mod bridge;
pub mod client;
pub mod engine;
pub mod resolver;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use backup::BackupSettings;
pub use backup::SqliteBackupCoordinator;
pub use bootstrap::BootstrapManager;
pub use bootstrap::BootstrapReport;
pub use bridge::StoredRoutineBridge;
pub use client::DatabaseSettings;
pub use client::DbClient;
pub use client::SqliteJournalMode;
pub use client::SqliteSyncMode;
pub use engine::EntityCount;
pub use engine::FetchOutcome;
pub use engine::RecordEngine;
pub use resolver::NO_HOD_SENTINEL;
pub use resolver::ReferenceResolver;
pub use resolver::RosterEntry;
