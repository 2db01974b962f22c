// crates/campus-registry-core/src/routine.rs
// ============================================================================
// Module: Routine Specs
// Description: Declarative specs for database-resident routines.
// Purpose: Name, parameter arity, result shape, and statement list for
//          every routine the bridge can invoke.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`RoutineSpec`] describes one server-side routine: its name, its
//! positional parameter count, whether it yields a scalar or a tabular
//! multi-set, and the ordered statements that implement it. Specs are
//! installed into the database-resident routine catalog by bootstrap and
//! resolved back out of it by the stored-routine bridge. Parameter binding
//! is positional only; there is no named-parameter binding.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Routine spec encoding/decoding errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutineSpecError {
    /// The catalog carried an unrecognized result-shape label.
    #[error("unknown routine shape: {0}")]
    UnknownShape(String),
    /// The catalog body could not be encoded or decoded.
    #[error("invalid routine body for {name}: {message}")]
    Body {
        /// Routine name.
        name: String,
        /// Underlying encode/decode message.
        message: String,
    },
}

// ============================================================================
// SECTION: Shape
// ============================================================================

/// Result shape of a routine invocation.
///
/// # Invariants
/// - Labels are stable; they are persisted in the routine catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutineShape {
    /// Single-row, single-column scalar result.
    Scalar,
    /// Zero or more row sets, drained and concatenated in order.
    TabularMultiSet,
}

impl RoutineShape {
    /// Returns the stable catalog label for the shape.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::TabularMultiSet => "tabular",
        }
    }

    /// Parses a catalog label back into a shape.
    ///
    /// # Errors
    ///
    /// Returns [`RoutineSpecError::UnknownShape`] for unrecognized labels.
    pub fn parse(label: &str) -> Result<Self, RoutineSpecError> {
        match label {
            "scalar" => Ok(Self::Scalar),
            "tabular" => Ok(Self::TabularMultiSet),
            other => Err(RoutineSpecError::UnknownShape(other.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Spec
// ============================================================================

/// Declarative description of one database-resident routine.
///
/// # Invariants
/// - `parameter_count` matches the highest positional parameter referenced
///   by any statement.
/// - Statements execute in list order; for tabular routines every produced
///   row is drained before control returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineSpec {
    /// Routine name, unique within the catalog.
    name: String,
    /// Number of positional parameters the routine accepts.
    parameter_count: usize,
    /// Result shape.
    shape: RoutineShape,
    /// Ordered statement list implementing the routine.
    statements: Vec<String>,
}

impl RoutineSpec {
    /// Creates a routine spec.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        parameter_count: usize,
        shape: RoutineShape,
        statements: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parameter_count,
            shape,
            statements,
        }
    }

    /// Returns the routine name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the positional parameter count.
    #[must_use]
    pub const fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// Returns the result shape.
    #[must_use]
    pub const fn shape(&self) -> RoutineShape {
        self.shape
    }

    /// Returns the ordered statement list.
    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Encodes the statement list for catalog storage.
    ///
    /// # Errors
    ///
    /// Returns [`RoutineSpecError::Body`] when encoding fails.
    pub fn statements_json(&self) -> Result<String, RoutineSpecError> {
        serde_json::to_string(&self.statements).map_err(|err| RoutineSpecError::Body {
            name: self.name.clone(),
            message: err.to_string(),
        })
    }

    /// Rebuilds a spec from its catalog row.
    ///
    /// # Errors
    ///
    /// Returns [`RoutineSpecError`] when the shape label or body is invalid.
    pub fn from_catalog(
        name: &str,
        shape_label: &str,
        parameter_count: usize,
        body_json: &str,
    ) -> Result<Self, RoutineSpecError> {
        let shape = RoutineShape::parse(shape_label)?;
        let statements: Vec<String> =
            serde_json::from_str(body_json).map_err(|err| RoutineSpecError::Body {
                name: name.to_string(),
                message: err.to_string(),
            })?;
        Ok(Self {
            name: name.to_string(),
            parameter_count,
            shape,
            statements,
        })
    }
}
