//! Integration tests for the Diesel roster adapters against embedded
//! PostgreSQL.
//!
//! Imports go through `RosterImportService` wired to
//! `DieselRosterRepository` and `DieselRosterImportRepository`, so the
//! transaction, the upserts and the read-back queries all run on a real
//! database. Each test provisions its own database from a migrated template.
//!
//! # Runtime Strategy
//!
//! Steps are synchronous and reuse one Tokio runtime held by the test
//! context, keeping database operations deterministic.

use std::sync::{Arc, Mutex};

use pg_embedded_setup_unpriv::TemporaryDatabase;
use roster::domain::ports::{
    FixtureRosterParser, RosterImportCommand, RosterImportRepository,
    RosterImportRepositoryError, RosterRepository, SaveRosterRequest,
};
use roster::domain::{
    AccessContext, AssignmentRecord, Employee, Error, ErrorCode, ImportOutcome, ImportPlan,
    ImportReport, ImportTarget, MonthYear, ParsedPayload, RosterImportService, Schedule, UserId,
};
use roster::outbound::persistence::{
    DbPool, DieselRosterImportRepository, DieselRosterRepository, PoolConfig,
};
use roster::test_support::payload_for;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::{Value, json};
use tokio::runtime::Runtime;

mod support;

use support::{handle_cluster_setup_failure, provision_template_database, shared_cluster};

type Importer =
    RosterImportService<FixtureRosterParser, DieselRosterRepository, DieselRosterImportRepository>;

// -----------------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------------

fn march() -> MonthYear {
    MonthYear::new(3, 2024).expect("valid period")
}

fn admin() -> AccessContext {
    AccessContext::Admin {
        user_id: UserId::random(),
        email: Some("admin@roster.invalid".to_owned()),
    }
}

#[fixture]
fn ana_payload() -> Value {
    payload_for(3, 2024, "UTI", &[("123", "Ana", &[(1, "M"), (2, "F")])])
}

// -----------------------------------------------------------------------------
// Test Context
// -----------------------------------------------------------------------------

struct TestContext {
    /// Tokio runtime reused for all async operations in this test.
    runtime: Runtime,
    adapters: Adapters,
    last_save: Option<Result<ImportReport, Error>>,
    _database: TemporaryDatabase,
}

/// Cheap clones of everything a step drives.
#[derive(Clone)]
struct Adapters {
    importer: Arc<Importer>,
    roster: DieselRosterRepository,
    writer: DieselRosterImportRepository,
}

type SharedContext = Arc<Mutex<TestContext>>;

fn setup_test_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let temp_db = provision_template_database(cluster)?;

    let config = PoolConfig::new(temp_db.url()).with_max_size(2);
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    let roster = DieselRosterRepository::new(pool.clone());
    let writer = DieselRosterImportRepository::new(pool);
    let importer = RosterImportService::new(
        Arc::new(FixtureRosterParser),
        Arc::new(roster.clone()),
        Arc::new(writer.clone()),
    );
    Ok(TestContext {
        runtime,
        adapters: Adapters {
            importer: Arc::new(importer),
            roster,
            writer,
        },
        last_save: None,
        _database: temp_db,
    })
}

#[fixture]
fn diesel_world() -> Option<SharedContext> {
    match setup_test_context() {
        Ok(ctx) => Some(Arc::new(Mutex::new(ctx))),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

/// Clone the adapters out of the locked context and run `operation` on the
/// shared runtime.
fn run<R>(world: &SharedContext, operation: impl FnOnce(Adapters) -> R) -> R::Output
where
    R: std::future::Future,
{
    assert!(
        tokio::runtime::Handle::try_current().is_err(),
        "do not call run from inside a Tokio runtime"
    );
    let (adapters, handle) = {
        let ctx = world.lock().expect("context lock");
        (ctx.adapters.clone(), ctx.runtime.handle().clone())
    };
    handle.block_on(operation(adapters))
}

fn directory(world: &SharedContext) -> Vec<Employee> {
    run(world, |a| async move { a.roster.list_employees().await }).expect("list employees")
}

fn employee(world: &SharedContext, matricula: &str) -> Employee {
    directory(world)
        .into_iter()
        .find(|employee| employee.matricula.as_ref() == matricula)
        .unwrap_or_else(|| panic!("matricula {matricula} should be stored"))
}

fn find_march(world: &SharedContext) -> Option<Schedule> {
    run(world, |a| async move { a.roster.find_schedule(march()).await }).expect("find schedule")
}

fn march_rows(world: &SharedContext) -> Vec<AssignmentRecord> {
    let schedule = find_march(world).expect("March is stored");
    run(world, |a| async move {
        a.roster.schedule_assignments(schedule.id).await
    })
    .expect("schedule assignments")
}

fn plan_for(payload: &Value, target: ImportTarget) -> ImportPlan {
    let parsed = ParsedPayload::from_value(payload).expect("valid payload");
    ImportPlan::build(&parsed, target)
}

fn committed_report(world: &SharedContext) -> ImportReport {
    let ctx = world.lock().expect("context lock");
    match ctx.last_save.as_ref().expect("save was executed") {
        Ok(report) => report.clone(),
        Err(err) => panic!("expected a committed import, got {err:?}"),
    }
}

fn rejection(world: &SharedContext) -> Error {
    let ctx = world.lock().expect("context lock");
    match ctx.last_save.as_ref().expect("save was executed") {
        Ok(report) => panic!("expected a rejection, got {report:?}"),
        Err(err) => err.clone(),
    }
}

// -----------------------------------------------------------------------------
// BDD Step Definitions
// -----------------------------------------------------------------------------

#[given("a Diesel-backed roster")]
fn a_diesel_backed_roster(world: SharedContext) {
    assert!(find_march(&world).is_none(), "a fresh database holds no schedule");
}

#[when("the administrator saves the payload")]
fn the_administrator_saves(world: SharedContext, payload: Value, overwrite: bool) {
    let result = run(&world, |a| async move {
        let access = admin();
        a.importer
            .save(&access, SaveRosterRequest { payload, overwrite })
            .await
    });
    world.lock().expect("context lock").last_save = Some(result);
}

#[then("the import commits")]
fn the_import_commits(world: SharedContext) {
    committed_report(&world);
}

#[then("the import is rejected")]
fn the_import_is_rejected(world: SharedContext) {
    rejection(&world);
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[rstest]
fn diesel_first_import_creates_schedule(diesel_world: Option<SharedContext>, ana_payload: Value) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: diesel_first_import_creates_schedule skipped");
        return;
    };

    a_diesel_backed_roster(world.clone());
    the_administrator_saves(world.clone(), ana_payload, false);
    the_import_commits(world.clone());
    let report = committed_report(&world);

    assert_eq!(report.outcome, ImportOutcome::Created);
    assert_eq!(report.assignments_written, 2);
    assert_eq!(report.employees_upserted, 1);
    let rows = march_rows(&world);
    let cells: Vec<(u32, &str, &str)> = rows
        .iter()
        .map(|row| (row.day, row.sector.as_str(), row.code.as_str()))
        .collect();
    assert_eq!(cells, vec![(1, "UTI", "M"), (2, "UTI", "F")]);
    assert!(rows.iter().all(|row| row.schedule_id == report.schedule_id));
    assert_eq!(directory(&world).len(), 1);
}

#[rstest]
fn diesel_overwrite_keeps_schedule_id(diesel_world: Option<SharedContext>, ana_payload: Value) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: diesel_overwrite_keeps_schedule_id skipped");
        return;
    };

    the_administrator_saves(world.clone(), ana_payload, false);
    the_import_commits(world.clone());
    let first = committed_report(&world);
    the_administrator_saves(
        world.clone(),
        payload_for(3, 2024, "UTI", &[("123", "Ana", &[(1, "T")])]),
        true,
    );
    the_import_commits(world.clone());
    let second = committed_report(&world);

    assert_eq!(second.outcome, ImportOutcome::Overwritten);
    assert_eq!(second.schedule_id, first.schedule_id);
    let rows = march_rows(&world);
    assert_eq!(rows.len(), 1, "overwrite clears rows the new payload lacks");
    assert_eq!((rows[0].day, rows[0].code.as_str()), (1, "T"));
}

#[rstest]
fn diesel_overwrite_twice_is_stable(diesel_world: Option<SharedContext>, ana_payload: Value) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: diesel_overwrite_twice_is_stable skipped");
        return;
    };

    the_administrator_saves(world.clone(), ana_payload.clone(), true);
    the_import_commits(world.clone());
    let once = march_rows(&world);
    the_administrator_saves(world.clone(), ana_payload, true);
    the_import_commits(world.clone());
    let twice = march_rows(&world);

    let key = |row: &AssignmentRecord| {
        (row.schedule_id, row.employee_id, row.sector.clone(), row.day, row.code.clone())
    };
    assert_eq!(
        once.iter().map(key).collect::<Vec<_>>(),
        twice.iter().map(key).collect::<Vec<_>>()
    );
}

#[rstest]
fn diesel_existing_schedule_needs_overwrite(
    diesel_world: Option<SharedContext>,
    ana_payload: Value,
) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: diesel_existing_schedule_needs_overwrite skipped");
        return;
    };

    the_administrator_saves(world.clone(), ana_payload, false);
    the_import_commits(world.clone());
    the_administrator_saves(
        world.clone(),
        payload_for(3, 2024, "UTI", &[("123", "Ana", &[(1, "T")])]),
        false,
    );
    the_import_is_rejected(world.clone());
    let err = rejection(&world);

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details().and_then(|d| d.get("code")).and_then(Value::as_str),
        Some("schedule_exists")
    );
    assert_eq!(march_rows(&world)[0].code, "M");
}

#[rstest]
fn diesel_create_over_existing_period_hits_unique_constraint(
    diesel_world: Option<SharedContext>,
    ana_payload: Value,
) {
    let Some(world) = diesel_world else {
        eprintln!(
            "SKIP-TEST-CLUSTER: diesel_create_over_existing_period_hits_unique_constraint skipped"
        );
        return;
    };

    the_administrator_saves(world.clone(), ana_payload.clone(), false);
    the_import_commits(world.clone());
    let plan = plan_for(&ana_payload, ImportTarget::Create);
    let result = run(&world, |a| async move { a.writer.apply(&plan).await });

    assert_eq!(
        result.expect_err("period is taken"),
        RosterImportRepositoryError::schedule_exists(3_u32, 2024)
    );
}

#[rstest]
fn diesel_failed_import_rolls_back(diesel_world: Option<SharedContext>, ana_payload: Value) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: diesel_failed_import_rolls_back skipped");
        return;
    };

    let mut plan = plan_for(&ana_payload, ImportTarget::Create);
    // Employees are upserted before assignments; the day CHECK fails last.
    plan.assignments
        .last_mut()
        .expect("payload has assignments")
        .day = 40;
    let result = run(&world, |a| async move { a.writer.apply(&plan).await });

    let err = result.expect_err("day 40 violates the CHECK constraint");
    assert!(
        matches!(err, RosterImportRepositoryError::Query { .. }),
        "expected a query error, got {err:?}"
    );
    assert!(
        err.to_string().contains("check constraint"),
        "database text should be kept: {err}"
    );
    assert!(find_march(&world).is_none(), "schedule insert must roll back");
    assert!(directory(&world).is_empty(), "employee upsert must roll back");
}

#[rstest]
fn diesel_repeated_matricula_keeps_later_name(diesel_world: Option<SharedContext>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: diesel_repeated_matricula_keeps_later_name skipped");
        return;
    };

    let payload = json!({
        "metadata": { "month": 3, "year": 2024, "month_name": "MARÇO" },
        "sectors": [
            { "name": "UTI", "employees": [
                { "matricula": "123", "name": "Ana", "days": { "1": "M" } }
            ]},
            { "name": "ENF", "employees": [
                { "matricula": "123", "name": "Ana Paula", "days": { "2": "T" } }
            ]}
        ],
        "legend": { "M": "Manhã", "T": "Tarde" }
    });
    the_administrator_saves(world.clone(), payload, false);
    the_import_commits(world.clone());
    let report = committed_report(&world);

    assert_eq!(report.employees_upserted, 1);
    assert_eq!(report.assignments_written, 2);
    let stored = directory(&world);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Ana Paula");
    let rows = march_rows(&world);
    assert!(rows.iter().all(|row| row.employee_name == "Ana Paula"));
    let sectors: Vec<&str> = rows.iter().map(|row| row.sector.as_str()).collect();
    assert_eq!(sectors, vec!["UTI", "ENF"]);
    let legend = run(&world, |a| async move { a.roster.legend().await }).expect("legend");
    let codes: Vec<&str> = legend.iter().map(|entry| entry.code.as_str()).collect();
    assert_eq!(codes, vec!["M", "T"]);
}

#[rstest]
fn diesel_reimport_renames_and_keeps_employee_id(
    diesel_world: Option<SharedContext>,
    ana_payload: Value,
) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: diesel_reimport_renames_and_keeps_employee_id skipped");
        return;
    };

    the_administrator_saves(world.clone(), ana_payload, false);
    the_import_commits(world.clone());
    let before = employee(&world, "123");

    the_administrator_saves(
        world.clone(),
        payload_for(4, 2024, "UTI", &[("123", "Ana Souza", &[(3, "N")])]),
        false,
    );
    the_import_commits(world.clone());
    let after = employee(&world, "123");

    assert_eq!(after.id, before.id);
    assert_eq!(after.name, "Ana Souza");
    assert_eq!(directory(&world).len(), 1);
    let id = before.id;
    let found = run(&world, |a| async move { a.roster.find_employee(id).await })
        .expect("find employee")
        .expect("employee exists");
    assert_eq!(found.name, "Ana Souza");
    assert!(
        march_rows(&world)
            .iter()
            .all(|row| row.employee_name == "Ana Souza"),
        "March rows join the refreshed name"
    );
}
