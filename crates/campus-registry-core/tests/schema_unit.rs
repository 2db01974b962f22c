// crates/campus-registry-core/tests/schema_unit.rs
// ============================================================================
// Module: Schema and Record Unit Tests
// Description: Targeted tests for descriptors, records, and routine specs.
// Purpose: Validate descriptor lookup, binding-order contracts, record
//          normalization, and routine catalog round-trips.
// ============================================================================

//! ## Overview
//! Unit-level tests for the core contracts:
//! - Descriptor lookup succeeds for the five entities and fails closed
//! - The key column leads the column list and binds last on update
//! - Empty record fields normalize to NULL at the binding boundary
//! - Routine specs survive the catalog encode/parse cycle

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    missing_docs,
    reason = "Test-only assertions and helpers are permitted."
)]

use campus_registry_core::InsertStrategy;
use campus_registry_core::Record;
use campus_registry_core::RecordError;
use campus_registry_core::RoutineShape;
use campus_registry_core::RoutineSpec;
use campus_registry_core::RoutineSpecError;
use campus_registry_core::SchemaError;
use campus_registry_core::SchemaRegistry;
use proptest::prelude::*;

// ============================================================================
// SECTION: Descriptor Lookup
// ============================================================================

#[test]
fn registry_describes_all_five_entities() {
    let registry = SchemaRegistry::standard();
    for entity in ["institution", "department", "staff", "course", "student"] {
        let descriptor = registry.describe(entity).expect("descriptor");
        assert_eq!(descriptor.entity().as_str(), entity);
    }
    assert_eq!(registry.descriptors().count(), 5);
}

#[test]
fn unknown_entity_fails_closed() {
    let registry = SchemaRegistry::standard();
    let err = registry.describe("dormitory").expect_err("unknown entity");
    assert_eq!(err, SchemaError::UnknownEntity("dormitory".to_string()));
}

#[test]
fn key_column_leads_every_column_list() {
    let registry = SchemaRegistry::standard();
    for descriptor in registry.descriptors() {
        assert_eq!(descriptor.columns()[0], descriptor.key_column());
    }
}

#[test]
fn update_binding_moves_the_key_to_the_end() {
    let registry = SchemaRegistry::standard();
    let staff = registry.describe("staff").expect("descriptor");
    assert_eq!(staff.update_parameter_order(), vec![1, 2, 3, 4, 5, 0]);
    let department = registry.describe("department").expect("descriptor");
    assert_eq!(department.update_parameter_order(), vec![1, 2, 0]);
}

#[test]
fn only_student_insertion_is_delegated() {
    let registry = SchemaRegistry::standard();
    for descriptor in registry.descriptors() {
        let expected = if descriptor.entity().as_str() == "student" {
            InsertStrategy::Procedure {
                routine: "add_student",
            }
        } else {
            InsertStrategy::Direct
        };
        assert_eq!(descriptor.insert_strategy(), expected);
    }
}

#[test]
fn select_projects_the_declared_columns_in_order() {
    let registry = SchemaRegistry::standard();
    let course = registry.describe("course").expect("descriptor");
    assert_eq!(course.select_sql(), "SELECT id, name, credits, department_id FROM course");
}

// ============================================================================
// SECTION: Records
// ============================================================================

#[test]
fn record_construction_enforces_arity() {
    let registry = SchemaRegistry::standard();
    let institution = registry.describe("institution").expect("descriptor");
    let err = Record::for_descriptor(institution, vec![Some("1".to_string())])
        .expect_err("arity mismatch");
    assert_eq!(err, RecordError::ArityMismatch {
        entity: "institution".to_string(),
        expected: 3,
        actual: 1,
    });
}

#[test]
fn empty_fields_normalize_to_null_only_when_binding() {
    let registry = SchemaRegistry::standard();
    let institution = registry.describe("institution").expect("descriptor");
    let record = Record::for_descriptor(
        institution,
        vec![Some("7".to_string()), Some(String::new()), None],
    )
    .expect("record");

    // Raw values are preserved on the record itself.
    assert_eq!(record.get("name"), Some(&Some(String::new())));
    // Normalization happens at the binding boundary.
    assert_eq!(record.bind_values(), vec![Some("7".to_string()), None, None]);
}

proptest! {
    #[test]
    fn binding_never_yields_an_empty_string(values in proptest::collection::vec(
        proptest::option::of(".*"),
        3,
    )) {
        let registry = SchemaRegistry::standard();
        let institution = registry.describe("institution").expect("descriptor");
        let record = Record::for_descriptor(institution, values).expect("record");
        for bound in record.bind_values() {
            if let Some(text) = bound {
                assert!(!text.is_empty());
            }
        }
    }
}

// ============================================================================
// SECTION: Routine Specs
// ============================================================================

#[test]
fn routine_spec_survives_the_catalog_cycle() {
    let spec = RoutineSpec::new(
        "department_roster",
        1,
        RoutineShape::TabularMultiSet,
        vec!["SELECT name FROM student WHERE department_id = ?1".to_string()],
    );
    let body = spec.statements_json().expect("encode");
    let rebuilt = RoutineSpec::from_catalog("department_roster", "tabular", 1, &body)
        .expect("rebuild");
    assert_eq!(rebuilt, spec);
}

#[test]
fn unrecognized_shape_label_is_rejected() {
    let err = RoutineShape::parse("cursor").expect_err("unknown shape");
    assert_eq!(err, RoutineSpecError::UnknownShape("cursor".to_string()));
}

#[test]
fn malformed_body_names_the_routine() {
    let err = RoutineSpec::from_catalog("add_student", "tabular", 8, "not json")
        .expect_err("bad body");
    assert!(matches!(err, RoutineSpecError::Body { name, .. } if name == "add_student"));
}
