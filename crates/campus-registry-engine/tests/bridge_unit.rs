// crates/campus-registry-engine/tests/bridge_unit.rs
// ============================================================================
// Module: Stored Routine Bridge Unit Tests
// Description: Targeted tests for catalog resolution and invocation.
// Purpose: Validate shape/arity enforcement, multi-statement draining,
//          positional parameter slicing, and null scalar handling.
// ============================================================================

//! ## Overview
//! Unit-level tests for the bridge invariants:
//! - Unknown routines and malformed catalog rows are distinct errors
//! - Scalar invocation rejects tabular routines and wrong arities
//! - Multi-statement bodies drain every produced row in order
//! - Each statement binds only the positional parameters it references
//! - Null and absent scalar results both surface as `None`

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    missing_docs,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;

use campus_registry_core::RoutineError;
use campus_registry_engine::BootstrapManager;
use campus_registry_engine::DatabaseSettings;
use campus_registry_engine::DbClient;
use campus_registry_engine::SqliteJournalMode;
use campus_registry_engine::SqliteSyncMode;
use campus_registry_engine::StoredRoutineBridge;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const SCHEMA_DDL: &str = "
CREATE TABLE department (id INTEGER PRIMARY KEY, name TEXT, head_of_department TEXT);
CREATE TABLE staff (id INTEGER PRIMARY KEY, name TEXT, phone TEXT, email TEXT, address TEXT, \
 department_id INTEGER);
CREATE TABLE student (id INTEGER PRIMARY KEY, name TEXT, phone TEXT, email TEXT, \
 date_of_birth TEXT, gender TEXT, institution_id INTEGER, department_id INTEGER);
CREATE TABLE note (id INTEGER PRIMARY KEY, text TEXT);
";

fn bridged_client(dir: &TempDir) -> (Arc<DbClient>, StoredRoutineBridge) {
    let settings = DatabaseSettings {
        path: dir.path().join("bridge.db3"),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteJournalMode::Wal,
        sync_mode: SqliteSyncMode::Full,
    };
    let client = Arc::new(DbClient::open(&settings).expect("open database"));
    client.batch(SCHEMA_DDL).expect("provision schema");
    let report = BootstrapManager::new(Arc::clone(&client)).install();
    assert!(report.is_complete(), "bootstrap failed: {:?}", report.failures());
    let bridge = StoredRoutineBridge::new(Arc::clone(&client));
    (client, bridge)
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

#[test]
fn unknown_routine_is_its_own_error() {
    let dir = TempDir::new().expect("tempdir");
    let (_client, bridge) = bridged_client(&dir);

    let err = bridge.call_function("no_such_routine", &[]).expect_err("unknown");
    assert!(matches!(err, RoutineError::UnknownRoutine(name) if name == "no_such_routine"));
}

#[test]
fn malformed_catalog_shape_is_a_catalog_error() {
    let dir = TempDir::new().expect("tempdir");
    let (client, bridge) = bridged_client(&dir);

    client
        .batch(
            "INSERT INTO routine_catalog (name, shape, parameter_count, body) VALUES \
             ('broken', 'pyramid', 0, '[\"SELECT 1\"]')",
        )
        .expect("seed catalog");
    let err = bridge.call_function("broken", &[]).expect_err("bad shape");
    assert!(matches!(err, RoutineError::Catalog(_)));
}

// ============================================================================
// SECTION: Signature Enforcement
// ============================================================================

#[test]
fn scalar_invocation_rejects_a_tabular_routine() {
    let dir = TempDir::new().expect("tempdir");
    let (_client, bridge) = bridged_client(&dir);

    let err = bridge
        .call_function("department_roster", &[text("CS")])
        .expect_err("shape mismatch");
    assert!(matches!(err, RoutineError::Catalog(_)));
}

#[test]
fn arity_mismatch_names_the_expected_and_actual_counts() {
    let dir = TempDir::new().expect("tempdir");
    let (_client, bridge) = bridged_client(&dir);

    let err = bridge
        .call_function("department_head", &[text("CS"), text("extra")])
        .expect_err("arity mismatch");
    let RoutineError::ParameterMismatch {
        name,
        expected,
        actual,
    } = err
    else {
        panic!("expected parameter mismatch");
    };
    assert_eq!(name, "department_head");
    assert_eq!(expected, 1);
    assert_eq!(actual, 2);
}

// ============================================================================
// SECTION: Invocation
// ============================================================================

#[test]
fn null_and_absent_scalar_results_are_both_none() {
    let dir = TempDir::new().expect("tempdir");
    let (client, bridge) = bridged_client(&dir);

    client
        .batch("INSERT INTO department (id, name, head_of_department) VALUES (1, 'Math', NULL)")
        .expect("seed department");

    let headless = bridge.call_function("department_head", &[text("Math")]).expect("call");
    assert_eq!(headless, None);
    let missing = bridge.call_function("department_head", &[text("History")]).expect("call");
    assert_eq!(missing, None);
}

#[test]
fn multi_statement_body_drains_rows_and_slices_parameters() {
    let dir = TempDir::new().expect("tempdir");
    let (client, bridge) = bridged_client(&dir);

    // Two statements: the first binds both parameters, the second none.
    client
        .batch(
            "INSERT INTO routine_catalog (name, shape, parameter_count, body) VALUES \
             ('note_and_list', 'tabular', 2, \
              '[\"INSERT INTO note (id, text) VALUES (?1, ?2)\", \
                \"SELECT text FROM note ORDER BY id\"]')",
        )
        .expect("seed catalog");

    let first = bridge
        .call_procedure("note_and_list", &[text("1"), text("alpha")])
        .expect("first call");
    assert_eq!(first, vec![vec![text("alpha")]]);

    let second = bridge
        .call_procedure("note_and_list", &[text("2"), text("beta")])
        .expect("second call");
    assert_eq!(second, vec![vec![text("alpha")], vec![text("beta")]]);
}

#[test]
fn failed_statement_rolls_back_the_whole_invocation() {
    let dir = TempDir::new().expect("tempdir");
    let (client, bridge) = bridged_client(&dir);

    // The second statement always fails; the first statement's insert must
    // not survive it.
    client
        .batch(
            "INSERT INTO routine_catalog (name, shape, parameter_count, body) VALUES \
             ('doomed', 'tabular', 1, \
              '[\"INSERT INTO note (id, text) VALUES (?1, ''orphan'')\", \
                \"SELECT * FROM missing_table\"]')",
        )
        .expect("seed catalog");

    let err = bridge.call_procedure("doomed", &[text("9")]).expect_err("doomed call");
    assert!(matches!(err, RoutineError::Invocation(_)));

    drop(client);
    let inspector =
        rusqlite::Connection::open(dir.path().join("bridge.db3")).expect("open for inspection");
    let orphans: i64 = inspector
        .query_row("SELECT COUNT(*) FROM note WHERE id = 9", [], |row| row.get(0))
        .expect("count orphans");
    assert_eq!(orphans, 0);
}
