// crates/campus-registry-core/src/schema.rs
// ============================================================================
// Module: Schema Registry
// Description: Declarative table descriptors for the campus schema.
// Purpose: Bind each entity to its columns, statement templates, and
//          insertion strategy.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The schema registry holds one [`TableDescriptor`] per entity for the
//! process lifetime. A descriptor is a declarative binding: ordered columns,
//! parameterized mutation templates, an explicit key column, and a tagged
//! insertion strategy. The record engine contains no table-specific code;
//! everything it needs to operate uniformly across the five entities lives
//! here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Names
// ============================================================================

/// Stable name of a managed entity (table).
///
/// # Invariants
/// - Values are lowercase identifiers matching the underlying table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntityName(&'static str);

impl EntityName {
    /// Institution entity.
    pub const INSTITUTION: Self = Self("institution");
    /// Department entity.
    pub const DEPARTMENT: Self = Self("department");
    /// Staff entity.
    pub const STAFF: Self = Self("staff");
    /// Course entity.
    pub const COURSE: Self = Self("course");
    /// Student entity.
    pub const STUDENT: Self = Self("student");

    /// Returns the entity name as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for EntityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Stable name of a column within an entity.
///
/// # Invariants
/// - Values are lowercase identifiers matching the underlying column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnName(&'static str);

impl ColumnName {
    /// Creates a column name from a static identifier.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the column name as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ColumnName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Schema registry errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No descriptor is registered for the requested entity.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
}

// ============================================================================
// SECTION: Insertion Strategy
// ============================================================================

/// How rows are inserted for an entity.
///
/// # Invariants
/// - `Procedure` routines accept the descriptor's columns as positional
///   parameters in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertStrategy {
    /// Execute the descriptor's insert template directly.
    Direct,
    /// Delegate insertion to a named server-side routine.
    Procedure {
        /// Name of the insertion routine.
        routine: &'static str,
    },
}

// ============================================================================
// SECTION: Table Descriptor
// ============================================================================

/// Declarative binding of an entity to its columns and mutation templates.
///
/// # Invariants
/// - `key_column` is always the first entry of `columns`.
/// - Insert templates (or delegated routine signatures) take the columns as
///   positional parameters in column order.
/// - Update templates bind the non-key columns in order, then the key last
///   (see [`TableDescriptor::update_parameter_order`]).
/// - Delete templates take the key as their single parameter.
#[derive(Debug, Clone, Copy)]
pub struct TableDescriptor {
    /// Entity (table) name.
    entity: EntityName,
    /// Ordered column list; the key column comes first.
    columns: &'static [ColumnName],
    /// Column whose value uniquely identifies a row.
    key_column: ColumnName,
    /// Parameterized insert template.
    insert_sql: &'static str,
    /// Parameterized update template (SET columns in order, key last).
    update_sql: &'static str,
    /// Parameterized delete template (single key parameter).
    delete_sql: &'static str,
    /// Insertion strategy tag.
    insert_strategy: InsertStrategy,
}

impl TableDescriptor {
    /// Returns the entity name.
    #[must_use]
    pub const fn entity(&self) -> EntityName {
        self.entity
    }

    /// Returns the ordered column list.
    #[must_use]
    pub const fn columns(&self) -> &'static [ColumnName] {
        self.columns
    }

    /// Returns the key column.
    #[must_use]
    pub const fn key_column(&self) -> ColumnName {
        self.key_column
    }

    /// Returns the insert template.
    #[must_use]
    pub const fn insert_sql(&self) -> &'static str {
        self.insert_sql
    }

    /// Returns the update template.
    #[must_use]
    pub const fn update_sql(&self) -> &'static str {
        self.update_sql
    }

    /// Returns the delete template.
    #[must_use]
    pub const fn delete_sql(&self) -> &'static str {
        self.delete_sql
    }

    /// Returns the insertion strategy.
    #[must_use]
    pub const fn insert_strategy(&self) -> InsertStrategy {
        self.insert_strategy
    }

    /// Returns the column indices in update binding order.
    ///
    /// The update template's WHERE clause references the key last, so the
    /// key column moves from its leading position to the end of the
    /// parameter list. This ordering is part of the descriptor contract,
    /// not an engine implementation detail.
    #[must_use]
    pub fn update_parameter_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (1 .. self.columns.len()).collect();
        order.push(0);
        order
    }

    /// Returns the unrestricted projection over the table.
    #[must_use]
    pub fn select_sql(&self) -> String {
        let projection = self
            .columns
            .iter()
            .map(|column| column.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("SELECT {projection} FROM {}", self.entity)
    }
}

// ============================================================================
// SECTION: Descriptor Table
// ============================================================================

/// Institution columns.
const INSTITUTION_COLUMNS: &[ColumnName] =
    &[ColumnName::new("id"), ColumnName::new("name"), ColumnName::new("address")];

/// Department columns.
const DEPARTMENT_COLUMNS: &[ColumnName] =
    &[ColumnName::new("id"), ColumnName::new("name"), ColumnName::new("head_of_department")];

/// Staff columns.
const STAFF_COLUMNS: &[ColumnName] = &[
    ColumnName::new("id"),
    ColumnName::new("name"),
    ColumnName::new("phone"),
    ColumnName::new("email"),
    ColumnName::new("address"),
    ColumnName::new("department_id"),
];

/// Course columns.
const COURSE_COLUMNS: &[ColumnName] = &[
    ColumnName::new("id"),
    ColumnName::new("name"),
    ColumnName::new("credits"),
    ColumnName::new("department_id"),
];

/// Student columns.
const STUDENT_COLUMNS: &[ColumnName] = &[
    ColumnName::new("id"),
    ColumnName::new("name"),
    ColumnName::new("phone"),
    ColumnName::new("email"),
    ColumnName::new("date_of_birth"),
    ColumnName::new("gender"),
    ColumnName::new("institution_id"),
    ColumnName::new("department_id"),
];

/// The five standard descriptors.
const STANDARD_DESCRIPTORS: &[TableDescriptor] = &[
    TableDescriptor {
        entity: EntityName::INSTITUTION,
        columns: INSTITUTION_COLUMNS,
        key_column: ColumnName::new("id"),
        insert_sql: "INSERT INTO institution (id, name, address) VALUES (?1, ?2, ?3)",
        update_sql: "UPDATE institution SET name = ?1, address = ?2 WHERE id = ?3",
        delete_sql: "DELETE FROM institution WHERE id = ?1",
        insert_strategy: InsertStrategy::Direct,
    },
    TableDescriptor {
        entity: EntityName::DEPARTMENT,
        columns: DEPARTMENT_COLUMNS,
        key_column: ColumnName::new("id"),
        insert_sql: "INSERT INTO department (id, name, head_of_department) VALUES (?1, ?2, ?3)",
        update_sql: "UPDATE department SET name = ?1, head_of_department = ?2 WHERE id = ?3",
        delete_sql: "DELETE FROM department WHERE id = ?1",
        insert_strategy: InsertStrategy::Direct,
    },
    TableDescriptor {
        entity: EntityName::STAFF,
        columns: STAFF_COLUMNS,
        key_column: ColumnName::new("id"),
        insert_sql: "INSERT INTO staff (id, name, phone, email, address, department_id) VALUES \
                     (?1, ?2, ?3, ?4, ?5, ?6)",
        update_sql: "UPDATE staff SET name = ?1, phone = ?2, email = ?3, address = ?4, \
                     department_id = ?5 WHERE id = ?6",
        delete_sql: "DELETE FROM staff WHERE id = ?1",
        insert_strategy: InsertStrategy::Direct,
    },
    TableDescriptor {
        entity: EntityName::COURSE,
        columns: COURSE_COLUMNS,
        key_column: ColumnName::new("id"),
        insert_sql: "INSERT INTO course (id, name, credits, department_id) VALUES \
                     (?1, ?2, ?3, ?4)",
        update_sql: "UPDATE course SET name = ?1, credits = ?2, department_id = ?3 WHERE id = ?4",
        delete_sql: "DELETE FROM course WHERE id = ?1",
        insert_strategy: InsertStrategy::Direct,
    },
    TableDescriptor {
        entity: EntityName::STUDENT,
        columns: STUDENT_COLUMNS,
        key_column: ColumnName::new("id"),
        insert_sql: "INSERT INTO student (id, name, phone, email, date_of_birth, gender, \
                     institution_id, department_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        update_sql: "UPDATE student SET name = ?1, phone = ?2, email = ?3, date_of_birth = ?4, \
                     gender = ?5, institution_id = ?6, department_id = ?7 WHERE id = ?8",
        delete_sql: "DELETE FROM student WHERE id = ?1",
        insert_strategy: InsertStrategy::Procedure {
            routine: "add_student",
        },
    },
];

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Immutable registry of table descriptors.
///
/// # Invariants
/// - Initialized once; descriptors never change for the process lifetime.
/// - Exactly one descriptor exists per entity name.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRegistry {
    /// Non-constructible marker; descriptors are static data.
    _private: (),
}

impl SchemaRegistry {
    /// Returns the registry of the five standard campus descriptors.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            _private: (),
        }
    }

    /// Looks up the descriptor for an entity.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownEntity`] when no descriptor matches.
    pub fn describe(&self, entity: &str) -> Result<&'static TableDescriptor, SchemaError> {
        STANDARD_DESCRIPTORS
            .iter()
            .find(|descriptor| descriptor.entity.as_str() == entity)
            .ok_or_else(|| SchemaError::UnknownEntity(entity.to_string()))
    }

    /// Iterates over all registered descriptors in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static TableDescriptor> {
        STANDARD_DESCRIPTORS.iter()
    }
}
