// crates/campus-registry-engine/src/bridge.rs
// ============================================================================
// Module: Stored Routine Bridge
// Description: Invokes database-resident routines by name.
// Purpose: Positional invocation of scalar functions and tabular
//          procedures, with full result-set draining.
// Dependencies: campus-registry-core, rusqlite
// ============================================================================

//! ## Overview
//! Routines live in a database-resident catalog installed by bootstrap:
//! one row per routine carrying its result shape, parameter arity, and an
//! ordered statement list. The bridge resolves a routine by name and
//! executes it with positional parameters; there is no named-parameter
//! binding. Tabular invocations drain every row of every statement, in
//! order, before the connection is released for further use; a routine that
//! produces no rows yields an empty sequence, not an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use campus_registry_core::RoutineError;
use campus_registry_core::RoutineShape;
use campus_registry_core::RoutineSpec;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::client::DbClient;
use crate::client::value_to_text;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// DDL for the routine catalog table.
pub(crate) const ROUTINE_CATALOG_DDL: &str = "CREATE TABLE IF NOT EXISTS routine_catalog (
    name TEXT PRIMARY KEY,
    shape TEXT NOT NULL,
    parameter_count INTEGER NOT NULL,
    body TEXT NOT NULL
) STRICT";

/// Lookup of one catalog row by routine name.
const ROUTINE_LOOKUP_SQL: &str =
    "SELECT shape, parameter_count, body FROM routine_catalog WHERE name = ?1";

// ============================================================================
// SECTION: Bridge
// ============================================================================

/// Invokes database-resident routines with positional parameters.
///
/// # Invariants
/// - Parameter order must match the routine's declared signature exactly.
/// - The connection is held for the whole invocation; tabular results are
///   fully drained before it is released.
#[derive(Debug, Clone)]
pub struct StoredRoutineBridge {
    /// Injected database client.
    client: Arc<DbClient>,
}

impl StoredRoutineBridge {
    /// Creates a bridge over the injected client.
    #[must_use]
    pub fn new(client: Arc<DbClient>) -> Self {
        Self {
            client,
        }
    }

    /// Calls a scalar-returning routine.
    ///
    /// Issued as a single-row, single-column evaluation of the routine's
    /// final statement; preceding statements execute first. Returns `None`
    /// when the row or value is null or absent.
    ///
    /// # Errors
    ///
    /// Returns [`RoutineError`] when the routine is unknown, is not scalar,
    /// the parameter count mismatches, or the database rejects the
    /// invocation.
    pub fn call_function(
        &self,
        name: &str,
        params: &[Option<String>],
    ) -> Result<Option<String>, RoutineError> {
        let spec = self.resolve(name)?;
        check_shape(&spec, RoutineShape::Scalar)?;
        check_arity(&spec, params.len())?;
        let mut guard = self
            .client
            .lock()
            .map_err(|err| RoutineError::Invocation(err.to_string()))?;
        let tx = guard
            .transaction()
            .map_err(|err| RoutineError::Invocation(err.to_string()))?;
        let scalar = run_scalar(&tx, &spec, params)?;
        tx.commit().map_err(|err| RoutineError::Invocation(err.to_string()))?;
        Ok(scalar)
    }

    /// Calls a routine and drains every result set it produces.
    ///
    /// Rows are concatenated across statements in execution order. An
    /// invocation that produces no rows returns an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns [`RoutineError`] when the routine is unknown, the parameter
    /// count mismatches, or the database rejects any statement; nothing is
    /// committed in that case.
    pub fn call_procedure(
        &self,
        name: &str,
        params: &[Option<String>],
    ) -> Result<Vec<Vec<Option<String>>>, RoutineError> {
        let spec = self.resolve(name)?;
        check_arity(&spec, params.len())?;
        let mut guard = self
            .client
            .lock()
            .map_err(|err| RoutineError::Invocation(err.to_string()))?;
        let tx = guard
            .transaction()
            .map_err(|err| RoutineError::Invocation(err.to_string()))?;
        let rows = drain_statements(&tx, spec.statements(), params)?;
        tx.commit().map_err(|err| RoutineError::Invocation(err.to_string()))?;
        Ok(rows)
    }

    /// Resolves a routine spec from the catalog.
    fn resolve(&self, name: &str) -> Result<RoutineSpec, RoutineError> {
        let guard = self
            .client
            .lock()
            .map_err(|err| RoutineError::Invocation(err.to_string()))?;
        let row = guard
            .query_row(ROUTINE_LOOKUP_SQL, [name], |row| {
                let shape: String = row.get(0)?;
                let parameter_count: i64 = row.get(1)?;
                let body: String = row.get(2)?;
                Ok((shape, parameter_count, body))
            })
            .optional()
            .map_err(|err| RoutineError::Invocation(err.to_string()))?;
        let Some((shape, parameter_count, body)) = row else {
            return Err(RoutineError::UnknownRoutine(name.to_string()));
        };
        let parameter_count = usize::try_from(parameter_count)
            .map_err(|_| RoutineError::Catalog(format!("negative arity for routine {name}")))?;
        RoutineSpec::from_catalog(name, &shape, parameter_count, &body)
            .map_err(|err| RoutineError::Catalog(err.to_string()))
    }
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Verifies the routine's declared shape.
fn check_shape(spec: &RoutineSpec, expected: RoutineShape) -> Result<(), RoutineError> {
    if spec.shape() == expected {
        Ok(())
    } else {
        Err(RoutineError::Catalog(format!(
            "routine {} has shape {}, expected {}",
            spec.name(),
            spec.shape().as_str(),
            expected.as_str()
        )))
    }
}

/// Verifies the supplied parameter count against the signature.
fn check_arity(spec: &RoutineSpec, actual: usize) -> Result<(), RoutineError> {
    if spec.parameter_count() == actual {
        Ok(())
    } else {
        Err(RoutineError::ParameterMismatch {
            name: spec.name().to_string(),
            expected: spec.parameter_count(),
            actual,
        })
    }
}

/// Executes a scalar routine body and evaluates its final statement.
fn run_scalar(
    tx: &Transaction<'_>,
    spec: &RoutineSpec,
    params: &[Option<String>],
) -> Result<Option<String>, RoutineError> {
    let Some((last, preceding)) = spec.statements().split_last() else {
        return Err(RoutineError::Catalog(format!("routine {} has no statements", spec.name())));
    };
    for statement in preceding {
        execute_statement(tx, statement, params)?;
    }
    let mut stmt =
        tx.prepare(last).map_err(|err| RoutineError::Invocation(err.to_string()))?;
    let bound = &params[.. stmt.parameter_count().min(params.len())];
    let value = stmt
        .query_row(params_from_iter(bound.iter()), |row| row.get::<_, Value>(0))
        .optional()
        .map_err(|err| RoutineError::Invocation(err.to_string()))?;
    Ok(value.as_ref().and_then(value_to_text))
}

/// Executes every statement in order, draining all produced rows.
fn drain_statements(
    tx: &Transaction<'_>,
    statements: &[String],
    params: &[Option<String>],
) -> Result<Vec<Vec<Option<String>>>, RoutineError> {
    let mut drained = Vec::new();
    for statement in statements {
        let mut stmt =
            tx.prepare(statement).map_err(|err| RoutineError::Invocation(err.to_string()))?;
        let bound = &params[.. stmt.parameter_count().min(params.len())];
        if stmt.column_count() == 0 {
            stmt.execute(params_from_iter(bound.iter()))
                .map_err(|err| RoutineError::Invocation(err.to_string()))?;
            continue;
        }
        let column_count = stmt.column_count();
        let mut rows = stmt
            .query(params_from_iter(bound.iter()))
            .map_err(|err| RoutineError::Invocation(err.to_string()))?;
        while let Some(row) =
            rows.next().map_err(|err| RoutineError::Invocation(err.to_string()))?
        {
            let mut record = Vec::with_capacity(column_count);
            for index in 0 .. column_count {
                let value: Value = row
                    .get(index)
                    .map_err(|err| RoutineError::Invocation(err.to_string()))?;
                record.push(value_to_text(&value));
            }
            drained.push(record);
        }
    }
    Ok(drained)
}

/// Executes one non-yielding statement.
fn execute_statement(
    tx: &Transaction<'_>,
    statement: &str,
    params: &[Option<String>],
) -> Result<(), RoutineError> {
    let mut stmt =
        tx.prepare(statement).map_err(|err| RoutineError::Invocation(err.to_string()))?;
    let bound = &params[.. stmt.parameter_count().min(params.len())];
    stmt.execute(params_from_iter(bound.iter()))
        .map_err(|err| RoutineError::Invocation(err.to_string()))?;
    Ok(())
}
