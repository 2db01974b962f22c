// crates/campus-registry-engine/src/bootstrap.rs
// ============================================================================
// Module: Bootstrap Manager
// Description: Idempotent installation of database-side objects.
// Purpose: (Re)install the validation and normalization triggers, the
//          insertion and roster routines, and the two derivation functions.
// Dependencies: campus-registry-core, rusqlite, tracing
// ============================================================================

//! ## Overview
//! Bootstrap runs once at startup. For each of six database-side objects it
//! drops-if-exists then (re)creates: two triggers (lowercase-normalize the
//! staff email on insert; reject students younger than 18 as of the current
//! date), the delegated student insertion routine, the department roster
//! routine, and the head-of-department and student-headcount derivation
//! functions. An object can fail to install, typically because its base
//! table does not yet exist on a first-ever run. That never aborts the
//! rest and never crashes the process: the failure is logged, surfaced in the
//! [`BootstrapReport`], and left for the next `install()` call once the
//! schema is provisioned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use campus_registry_core::BootstrapError;
use campus_registry_core::RoutineShape;
use campus_registry_core::RoutineSpec;
use rusqlite::params;

use crate::bridge::ROUTINE_CATALOG_DDL;
use crate::client::DbClient;

// ============================================================================
// SECTION: Object Definitions
// ============================================================================

/// Staff email normalization trigger.
const STAFF_EMAIL_TRIGGER: &str = "staff_email_lowercase";

/// Drop statement for the staff email trigger.
const STAFF_EMAIL_TRIGGER_DROP: &str = "DROP TRIGGER IF EXISTS staff_email_lowercase";

/// Create statement for the staff email trigger.
const STAFF_EMAIL_TRIGGER_CREATE: &str = "CREATE TRIGGER staff_email_lowercase
AFTER INSERT ON staff
FOR EACH ROW
BEGIN
    UPDATE staff SET email = lower(NEW.email) WHERE id = NEW.id;
END";

/// Student minimum-age validation trigger.
const STUDENT_AGE_TRIGGER: &str = "student_minimum_age";

/// Drop statement for the student age trigger.
const STUDENT_AGE_TRIGGER_DROP: &str = "DROP TRIGGER IF EXISTS student_minimum_age";

/// Create statement for the student age trigger.
///
/// Deterministic as of insertion time's current date; a date of birth less
/// than 18 years before now is rejected with the message the collaborator
/// surfaces verbatim.
const STUDENT_AGE_TRIGGER_CREATE: &str = "CREATE TRIGGER student_minimum_age
BEFORE INSERT ON student
FOR EACH ROW
WHEN NEW.date_of_birth IS NOT NULL
 AND date(NEW.date_of_birth) > date('now', '-18 years')
BEGIN
    SELECT RAISE(ABORT, 'invalid date of birth: student must be at least 18 years old');
END";

/// Statement removing one catalog routine.
const ROUTINE_DROP_SQL: &str = "DELETE FROM routine_catalog WHERE name = ?1";

/// Statement installing one catalog routine.
const ROUTINE_CREATE_SQL: &str =
    "INSERT INTO routine_catalog (name, shape, parameter_count, body) VALUES (?1, ?2, ?3, ?4)";

/// Builds the four routine specs installed by bootstrap.
fn standard_routines() -> Vec<RoutineSpec> {
    vec![
        RoutineSpec::new(
            "add_student",
            8,
            RoutineShape::TabularMultiSet,
            vec![
                "INSERT INTO student (id, name, phone, email, date_of_birth, gender, \
                 institution_id, department_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                    .to_string(),
            ],
        ),
        RoutineSpec::new(
            "department_roster",
            1,
            RoutineShape::TabularMultiSet,
            vec![
                "SELECT s.name, s.email FROM student s JOIN department d ON s.department_id = \
                 d.id WHERE d.name = ?1"
                    .to_string(),
            ],
        ),
        RoutineSpec::new(
            "department_head",
            1,
            RoutineShape::Scalar,
            vec!["SELECT head_of_department FROM department WHERE name = ?1".to_string()],
        ),
        RoutineSpec::new(
            "student_headcount",
            1,
            RoutineShape::Scalar,
            vec!["SELECT COUNT(*) FROM student WHERE institution_id = ?1".to_string()],
        ),
    ]
}

// ============================================================================
// SECTION: Report
// ============================================================================

/// Outcome of one bootstrap pass, object by object.
///
/// # Invariants
/// - Every object appears in exactly one of `installed` or `failures`.
#[derive(Debug, Default)]
pub struct BootstrapReport {
    /// Objects installed (or reinstalled) this pass.
    installed: Vec<String>,
    /// Objects left uninstalled, with the reason.
    failures: Vec<BootstrapError>,
}

impl BootstrapReport {
    /// Returns the installed object names.
    #[must_use]
    pub fn installed(&self) -> &[String] {
        &self.installed
    }

    /// Returns the per-object failures.
    #[must_use]
    pub fn failures(&self) -> &[BootstrapError] {
        &self.failures
    }

    /// Returns true when every object installed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// SECTION: Manager
// ============================================================================

/// Idempotently installs the database-side objects.
#[derive(Debug, Clone)]
pub struct BootstrapManager {
    /// Injected database client.
    client: Arc<DbClient>,
}

impl BootstrapManager {
    /// Creates a manager over the injected client.
    #[must_use]
    pub fn new(client: Arc<DbClient>) -> Self {
        Self {
            client,
        }
    }

    /// Installs (or reinstalls) every database-side object.
    ///
    /// Idempotent: each object is dropped-if-exists then created. Failures
    /// are logged, recorded in the report, and do not abort the remaining
    /// objects; invoke again after the schema is provisioned to pick up
    /// whatever was left uninstalled.
    #[must_use]
    pub fn install(&self) -> BootstrapReport {
        let mut report = BootstrapReport::default();
        self.install_object(&mut report, "routine_catalog", |connection| {
            connection.execute_batch(ROUTINE_CATALOG_DDL).map_err(|err| err.to_string())
        });
        self.install_object(&mut report, STAFF_EMAIL_TRIGGER, |connection| {
            connection
                .execute_batch(STAFF_EMAIL_TRIGGER_DROP)
                .and_then(|()| connection.execute_batch(STAFF_EMAIL_TRIGGER_CREATE))
                .map_err(|err| err.to_string())
        });
        self.install_object(&mut report, STUDENT_AGE_TRIGGER, |connection| {
            connection
                .execute_batch(STUDENT_AGE_TRIGGER_DROP)
                .and_then(|()| connection.execute_batch(STUDENT_AGE_TRIGGER_CREATE))
                .map_err(|err| err.to_string())
        });
        for routine in standard_routines() {
            let name = routine.name().to_string();
            self.install_object(&mut report, &name, |connection| {
                let body = routine.statements_json().map_err(|err| err.to_string())?;
                let arity = i64::try_from(routine.parameter_count())
                    .map_err(|err| err.to_string())?;
                connection
                    .execute(ROUTINE_DROP_SQL, params![routine.name()])
                    .map_err(|err| err.to_string())?;
                connection
                    .execute(
                        ROUTINE_CREATE_SQL,
                        params![routine.name(), routine.shape().as_str(), arity, body],
                    )
                    .map_err(|err| err.to_string())?;
                Ok(())
            });
        }
        if report.is_complete() {
            tracing::info!(objects = report.installed().len(), "bootstrap complete");
        }
        report
    }

    /// Installs one object, recording success or failure in the report.
    fn install_object<F>(&self, report: &mut BootstrapReport, object: &str, install: F)
    where
        F: FnOnce(&rusqlite::Connection) -> Result<(), String>,
    {
        let outcome = match self.client.lock() {
            Ok(guard) => install(&guard),
            Err(err) => Err(err.to_string()),
        };
        match outcome {
            Ok(()) => report.installed.push(object.to_string()),
            Err(message) => {
                tracing::warn!(object, error = %message, "bootstrap object left uninstalled");
                report.failures.push(BootstrapError {
                    object: object.to_string(),
                    message,
                });
            }
        }
    }
}
