// crates/campus-registry-engine/src/resolver.rs
// ============================================================================
// Module: Reference Resolver
// Description: Auxiliary lookups feeding the derivation routines.
// Purpose: Translate user-supplied keys into the values the derived
//          queries expect, with defined fallbacks.
// Dependencies: campus-registry-core, rusqlite
// ============================================================================

//! ## Overview
//! The derivation routines are keyed by department name, but collaborators
//! often hold a department identifier. The resolver bridges that gap: an
//! identifier that resolves to a department yields its canonical name, and
//! a miss falls through to the raw input unchanged so downstream lookups
//! still attempt a best-effort match. Null-ish derivation results become
//! defined sentinels, never raw nulls.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use campus_registry_core::RoutineError;
use rusqlite::OptionalExtension;

use crate::bridge::StoredRoutineBridge;
use crate::client::DbClient;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Sentinel returned when a department has no head on record.
pub const NO_HOD_SENTINEL: &str = "No HOD found";

/// Lookup of a department's canonical name by identifier.
const DEPARTMENT_NAME_SQL: &str = "SELECT name FROM department WHERE id = ?1";

/// Name of the head-of-department derivation function.
const HOD_ROUTINE: &str = "department_head";

/// Name of the department roster procedure.
const ROSTER_ROUTINE: &str = "department_roster";

// ============================================================================
// SECTION: Roster Entry
// ============================================================================

/// One (name, email) pair from the department roster procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Student name.
    pub name: Option<String>,
    /// Student email.
    pub email: Option<String>,
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves collaborator-supplied references for the derived queries.
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    /// Injected database client.
    client: Arc<DbClient>,
    /// Bridge for derivation routines.
    bridge: StoredRoutineBridge,
}

impl ReferenceResolver {
    /// Creates a resolver over the injected client.
    #[must_use]
    pub fn new(client: Arc<DbClient>) -> Self {
        let bridge = StoredRoutineBridge::new(Arc::clone(&client));
        Self {
            client,
            bridge,
        }
    }

    /// Resolves a department reference to its canonical name.
    ///
    /// A reference that matches a department identifier yields the stored
    /// name; a miss returns the raw input unchanged (fallback, not an
    /// error).
    ///
    /// # Errors
    ///
    /// Returns [`RoutineError::Invocation`] only when the lookup query
    /// itself fails.
    pub fn resolve_department_name(&self, raw: &str) -> Result<String, RoutineError> {
        let guard = self
            .client
            .lock()
            .map_err(|err| RoutineError::Invocation(err.to_string()))?;
        let name = guard
            .query_row(DEPARTMENT_NAME_SQL, [raw], |row| row.get::<_, String>(0))
            .optional()
            .map_err(|err| RoutineError::Invocation(err.to_string()))?;
        Ok(name.unwrap_or_else(|| raw.to_string()))
    }

    /// Returns the head of the named department, or the sentinel.
    ///
    /// The derivation function yielding null or no row produces the literal
    /// [`NO_HOD_SENTINEL`], never a raw null.
    ///
    /// # Errors
    ///
    /// Returns [`RoutineError`] when the derivation function cannot be
    /// invoked.
    pub fn resolve_hod(&self, department_name: &str) -> Result<String, RoutineError> {
        let value =
            self.bridge.call_function(HOD_ROUTINE, &[Some(department_name.to_string())])?;
        Ok(value.unwrap_or_else(|| NO_HOD_SENTINEL.to_string()))
    }

    /// Resolves a raw department reference and returns its head.
    ///
    /// # Errors
    ///
    /// Returns [`RoutineError`] when the lookup or derivation fails.
    pub fn hod_by_reference(&self, raw: &str) -> Result<String, RoutineError> {
        let name = self.resolve_department_name(raw)?;
        self.resolve_hod(&name)
    }

    /// Returns the (name, email) roster of a department reference.
    ///
    /// The reference is resolved like [`Self::resolve_department_name`];
    /// a department with no students yields an empty roster, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RoutineError`] when the roster procedure cannot be
    /// invoked.
    pub fn department_roster(&self, raw: &str) -> Result<Vec<RosterEntry>, RoutineError> {
        let name = self.resolve_department_name(raw)?;
        let rows = self.bridge.call_procedure(ROSTER_ROUTINE, &[Some(name)])?;
        Ok(rows
            .into_iter()
            .map(|mut row| {
                let email = if row.len() > 1 {
                    row.remove(1)
                } else {
                    None
                };
                let name = if row.is_empty() {
                    None
                } else {
                    row.remove(0)
                };
                RosterEntry {
                    name,
                    email,
                }
            })
            .collect())
    }
}
