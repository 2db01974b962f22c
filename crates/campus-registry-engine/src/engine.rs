// crates/campus-registry-engine/src/engine.rs
// ============================================================================
// Module: Record Engine
// Description: Uniform CRUD surface over the campus descriptors.
// Purpose: Fetch, insert (direct or delegated), update, and delete rows
//          with commit-then-backup semantics.
// Dependencies: campus-registry-core, rusqlite, tracing
// ============================================================================

//! ## Overview
//! The record engine behaves uniformly across all five entities: it carries
//! no table-specific code, only what the descriptors declare. Every call
//! runs validate → execute inside a transaction → commit → (mutations only)
//! one best-effort backup attempt → return. There is no retry state; a
//! failure before commit aborts the whole operation and the backup sink is
//! not invoked. Reads degrade: a failed fetch yields zero rows plus a
//! status error, never a hard failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use campus_registry_core::BackupSink;
use campus_registry_core::EntityName;
use campus_registry_core::FetchError;
use campus_registry_core::InsertStrategy;
use campus_registry_core::MutationError;
use campus_registry_core::Record;
use campus_registry_core::RoutineError;
use campus_registry_core::SchemaError;
use campus_registry_core::SchemaRegistry;
use campus_registry_core::TableDescriptor;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::bridge::StoredRoutineBridge;
use crate::client::DbClient;
use crate::client::value_to_text;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of an unrestricted fetch over one entity.
///
/// # Invariants
/// - When `error` is set, `records` is empty: the read degraded rather than
///   failed.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Rows in descriptor column order.
    pub records: Vec<Record>,
    /// Non-fatal error for status display, when the read degraded.
    pub error: Option<FetchError>,
}

/// Row count for one entity, as shown on the census surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityCount {
    /// Entity name.
    pub entity: EntityName,
    /// Number of rows, zero when the count itself failed.
    pub rows: u64,
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Schema-driven CRUD surface over the injected client.
///
/// # Invariants
/// - The backup sink is invoked exactly once per successful mutation, after
///   commit, and never on failure.
/// - Records are transient; the engine retains none across calls.
pub struct RecordEngine {
    /// Injected database client.
    client: Arc<DbClient>,
    /// Immutable descriptor registry.
    registry: SchemaRegistry,
    /// Bridge for delegated insertions.
    bridge: StoredRoutineBridge,
    /// Post-commit backup sink.
    backup: Arc<dyn BackupSink>,
}

impl RecordEngine {
    /// Creates an engine over the injected client and backup sink.
    #[must_use]
    pub fn new(client: Arc<DbClient>, backup: Arc<dyn BackupSink>) -> Self {
        let bridge = StoredRoutineBridge::new(Arc::clone(&client));
        Self {
            client,
            registry: SchemaRegistry::standard(),
            bridge,
            backup,
        }
    }

    /// Returns the descriptor registry.
    #[must_use]
    pub const fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Fetches every row of an entity.
    ///
    /// Database errors degrade to an empty outcome carrying the error for
    /// status display; the collaborator shows zero rows, never a crash.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownEntity`] only when the entity has no
    /// descriptor.
    pub fn fetch_all(&self, entity: &str) -> Result<FetchOutcome, SchemaError> {
        let descriptor = self.registry.describe(entity)?;
        match self.query_rows(descriptor) {
            Ok(records) => Ok(FetchOutcome {
                records,
                error: None,
            }),
            Err(error) => {
                tracing::warn!(entity, %error, "fetch degraded to empty result");
                Ok(FetchOutcome {
                    records: Vec::new(),
                    error: Some(error),
                })
            }
        }
    }

    /// Inserts one record, directly or via the descriptor's routine.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError`] when the entity is unknown, the record does
    /// not match the descriptor, or the database rejects the row (constraint
    /// or trigger-raised validation); the underlying message is carried
    /// verbatim and no backup attempt is made.
    pub fn insert(&self, entity: &str, record: &Record) -> Result<(), MutationError> {
        let descriptor = self.describe_for_mutation(entity)?;
        let values = validated_values(descriptor, record)?;
        match descriptor.insert_strategy() {
            InsertStrategy::Direct => {
                self.execute_mutation(descriptor.insert_sql(), &values)?;
            }
            InsertStrategy::Procedure {
                routine,
            } => {
                self.bridge
                    .call_procedure(routine, &values)
                    .map_err(mutation_from_routine)?;
            }
        }
        self.attempt_backup();
        Ok(())
    }

    /// Updates the row whose key matches the record's key field.
    ///
    /// The key column leaves its leading position and binds last, matching
    /// the update template's WHERE clause.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError`] under the same conditions as
    /// [`RecordEngine::insert`].
    pub fn update(&self, entity: &str, record: &Record) -> Result<(), MutationError> {
        let descriptor = self.describe_for_mutation(entity)?;
        let values = validated_values(descriptor, record)?;
        let reordered: Vec<Option<String>> = descriptor
            .update_parameter_order()
            .into_iter()
            .map(|index| values[index].clone())
            .collect();
        self.execute_mutation(descriptor.update_sql(), &reordered)?;
        self.attempt_backup();
        Ok(())
    }

    /// Deletes the row with the given key.
    ///
    /// Deleting a non-existent key is not an error: zero rows affected is a
    /// successful, committed outcome and still triggers a backup attempt.
    /// An empty key binds as NULL, like every other empty field.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError`] when the entity is unknown or the database
    /// rejects the statement.
    pub fn delete(&self, entity: &str, key: &str) -> Result<(), MutationError> {
        let descriptor = self.describe_for_mutation(entity)?;
        let key = if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        };
        self.execute_mutation(descriptor.delete_sql(), &[key])?;
        self.attempt_backup();
        Ok(())
    }

    /// Returns per-entity row counts for the census surface.
    ///
    /// A failed count degrades to zero for that entity, mirroring the fetch
    /// posture.
    #[must_use]
    pub fn census(&self) -> Vec<EntityCount> {
        self.registry
            .descriptors()
            .map(|descriptor| EntityCount {
                entity: descriptor.entity(),
                rows: self.count_rows(descriptor),
            })
            .collect()
    }

    /// Counts the rows of one entity, degrading to zero on error.
    fn count_rows(&self, descriptor: &TableDescriptor) -> u64 {
        let sql = format!("SELECT COUNT(*) FROM {}", descriptor.entity());
        let result = self
            .client
            .lock()
            .map_err(|err| err.to_string())
            .and_then(|guard| {
                guard
                    .query_row(&sql, [], |row| row.get::<_, i64>(0))
                    .map_err(|err| err.to_string())
            });
        match result {
            Ok(count) => u64::try_from(count).unwrap_or(0),
            Err(error) => {
                tracing::warn!(entity = %descriptor.entity(), error = %error, "census count degraded to zero");
                0
            }
        }
    }

    /// Runs the unrestricted projection for a descriptor.
    fn query_rows(&self, descriptor: &TableDescriptor) -> Result<Vec<Record>, FetchError> {
        let guard = self.client.lock().map_err(|err| FetchError::Query(err.to_string()))?;
        let mut stmt = guard
            .prepare(&descriptor.select_sql())
            .map_err(|err| FetchError::Query(err.to_string()))?;
        let column_count = descriptor.columns().len();
        let rows = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(column_count);
                for index in 0 .. column_count {
                    let value: Value = row.get(index)?;
                    values.push(value_to_text(&value));
                }
                Ok(values)
            })
            .map_err(|err| FetchError::Query(err.to_string()))?;
        let mut records = Vec::new();
        for row in rows {
            let values = row.map_err(|err| FetchError::Query(err.to_string()))?;
            let fields = descriptor
                .columns()
                .iter()
                .map(|column| column.as_str().to_string())
                .zip(values)
                .collect();
            records.push(Record::from_pairs(fields));
        }
        Ok(records)
    }

    /// Executes one mutation statement inside a committed transaction.
    fn execute_mutation(
        &self,
        sql: &str,
        values: &[Option<String>],
    ) -> Result<(), MutationError> {
        let mut guard = self
            .client
            .lock()
            .map_err(|err| MutationError::Connectivity(err.to_string()))?;
        let tx = guard
            .transaction()
            .map_err(|err| MutationError::Connectivity(err.to_string()))?;
        tx.execute(sql, params_from_iter(values.iter()))
            .map_err(|err| MutationError::Rejected(err.to_string()))?;
        tx.commit().map_err(|err| MutationError::Rejected(err.to_string()))?;
        Ok(())
    }

    /// Looks up a descriptor, mapping registry misses into mutation errors.
    fn describe_for_mutation(
        &self,
        entity: &str,
    ) -> Result<&'static TableDescriptor, MutationError> {
        self.registry.describe(entity).map_err(|err| match err {
            SchemaError::UnknownEntity(name) => MutationError::UnknownEntity(name),
        })
    }

    /// Fires one best-effort backup attempt after a committed mutation.
    ///
    /// Failures are logged and never surfaced; the primary record has
    /// already committed.
    fn attempt_backup(&self) {
        if let Err(error) = self.backup.attempt() {
            tracing::warn!(%error, "backup attempt failed after committed mutation");
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a record against its descriptor and normalizes for binding.
fn validated_values(
    descriptor: &TableDescriptor,
    record: &Record,
) -> Result<Vec<Option<String>>, MutationError> {
    if record.len() != descriptor.columns().len() {
        return Err(MutationError::InvalidRecord(format!(
            "{} expects {} fields, got {}",
            descriptor.entity(),
            descriptor.columns().len(),
            record.len()
        )));
    }
    Ok(record.bind_values())
}

/// Maps a delegated-insertion routine failure into the mutation taxonomy.
fn mutation_from_routine(error: RoutineError) -> MutationError {
    match error {
        RoutineError::Invocation(message) => MutationError::Rejected(message),
        other => MutationError::Rejected(other.to_string()),
    }
}
