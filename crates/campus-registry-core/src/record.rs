// crates/campus-registry-core/src/record.rs
// ============================================================================
// Module: Record Model
// Description: Ordered column/value rows exchanged with the engine.
// Purpose: Carry one row per operation with NULL normalization at the
//          binding boundary.
// Dependencies: crate::schema, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Record`] is an ordered mapping from column name to an optional text
//! value: one instance per row surfaced to or submitted by the collaborator
//! layer. Records are transient; the engine never retains them across calls.
//! Empty input is treated as NULL, not as an empty string, at the
//! statement-binding boundary. This applies uniformly, including key
//! fields.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::schema::TableDescriptor;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Record construction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The supplied value count does not match the descriptor's columns.
    #[error("record arity mismatch for {entity}: expected {expected} values, got {actual}")]
    ArityMismatch {
        /// Entity the record was built for.
        entity: String,
        /// Number of columns in the descriptor.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
}

// ============================================================================
// SECTION: Record
// ============================================================================

/// One row, as an ordered list of column/value pairs.
///
/// # Invariants
/// - Field order matches the descriptor's column order.
/// - Values are raw collaborator input; NULL normalization happens when
///   binding, not when constructing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Ordered (column, value) pairs.
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    /// Builds a record for a descriptor from values in column order.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::ArityMismatch`] when the value count differs
    /// from the descriptor's column count.
    pub fn for_descriptor(
        descriptor: &TableDescriptor,
        values: Vec<Option<String>>,
    ) -> Result<Self, RecordError> {
        if values.len() != descriptor.columns().len() {
            return Err(RecordError::ArityMismatch {
                entity: descriptor.entity().as_str().to_string(),
                expected: descriptor.columns().len(),
                actual: values.len(),
            });
        }
        let fields = descriptor
            .columns()
            .iter()
            .map(|column| column.as_str().to_string())
            .zip(values)
            .collect();
        Ok(Self {
            fields,
        })
    }

    /// Builds a record from explicit (column, value) pairs.
    #[must_use]
    pub fn from_pairs(fields: Vec<(String, Option<String>)>) -> Self {
        Self {
            fields,
        }
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the value of a named field, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Option<String>> {
        self.fields.iter().find(|(name, _)| name == column).map(|(_, value)| value)
    }

    /// Iterates over (column, value) pairs in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Option<String>)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the field values in column order, normalized for binding.
    ///
    /// Empty strings become NULL here and nowhere else.
    #[must_use]
    pub fn bind_values(&self) -> Vec<Option<String>> {
        self.fields.iter().map(|(_, value)| normalize(value.as_deref())).collect()
    }
}

/// Normalizes one raw value at the binding boundary.
fn normalize(value: Option<&str>) -> Option<String> {
    match value {
        None => None,
        Some(text) if text.is_empty() => None,
        Some(text) => Some(text.to_string()),
    }
}
