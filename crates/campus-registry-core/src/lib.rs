// crates/campus-registry-core/src/lib.rs
// ============================================================================
// Module: Campus Registry Core
// Description: Domain model for the schema-driven record engine.
// Purpose: Define descriptors, records, routine specs, and contract surfaces.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types for the campus record-management engine. This crate is
//! backend-agnostic: it describes tables, rows, and server-side routines
//! declaratively, and defines the error taxonomy and trait seams the storage
//! backend implements. It never touches a database.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod interfaces;
pub mod record;
pub mod routine;
pub mod schema;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use interfaces::BackupError;
pub use interfaces::BackupSink;
pub use interfaces::BootstrapError;
pub use interfaces::ConnectivityError;
pub use interfaces::FetchError;
pub use interfaces::MutationError;
pub use interfaces::RoutineError;
pub use record::Record;
pub use record::RecordError;
pub use routine::RoutineShape;
pub use routine::RoutineSpecError;
pub use routine::RoutineSpec;
pub use schema::ColumnName;
pub use schema::EntityName;
pub use schema::InsertStrategy;
pub use schema::SchemaError;
pub use schema::SchemaRegistry;
pub use schema::TableDescriptor;
