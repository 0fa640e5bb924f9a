//! PostgreSQL-backed import writer.
//!
//! Every step of an [`ImportPlan`] runs in one transaction; any failure rolls
//! the whole import back.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::upsert::excluded;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{RosterImportRepository, RosterImportRepositoryError};
use crate::domain::{
    CodeLegendEntry, EmployeeDraft, EmployeeId, ImportOutcome, ImportPlan, ImportReport,
    ImportTarget, Matricula, MonthYear, NewAssignment, ScheduleId, resolve_assignments,
};

use super::error_mapping::{is_unique_violation, map_diesel_error, pool_message};
use super::models::{
    CodeLegendRow, NewAssignmentRow, NewEmployeeRow, NewScheduleRow, ScheduleUpdate,
};
use super::pool::{DbPool, PoolError};
use super::schema::{assignments, code_legend, employees, schedules};

const SCHEDULE_PERIOD_CONSTRAINT: &str = "schedules_month_year_key";

/// Rows per multi-row INSERT; keeps bind parameters well under the protocol
/// limit.
const INSERT_CHUNK: usize = 1000;

/// Diesel-backed implementation of [`RosterImportRepository`].
#[derive(Clone)]
pub struct DieselRosterImportRepository {
    pool: DbPool,
}

impl DieselRosterImportRepository {
    /// Create a writer over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RosterImportRepositoryError {
    RosterImportRepositoryError::connection(pool_message(error))
}

fn map_import_error(error: DieselError, period: MonthYear) -> RosterImportRepositoryError {
    if is_unique_violation(&error, SCHEDULE_PERIOD_CONSTRAINT) {
        return RosterImportRepositoryError::schedule_exists(period.month(), period.year());
    }
    map_diesel_error(
        error,
        |message| RosterImportRepositoryError::query(message),
        |message| RosterImportRepositoryError::connection(message),
    )
}

fn out_of_range(what: &str) -> DieselError {
    DieselError::QueryBuilderError(format!("{what} out of range").into())
}

async fn write_schedule(
    conn: &mut AsyncPgConnection,
    plan: &ImportPlan,
) -> Result<(ScheduleId, ImportOutcome), DieselError> {
    let meta = &plan.metadata;
    if let ImportTarget::Overwrite(schedule_id) = plan.target {
        let id = *schedule_id.as_uuid();
        diesel::delete(assignments::table.filter(assignments::schedule_id.eq(id)))
            .execute(conn)
            .await?;
        let updated = diesel::update(schedules::table.find(id))
            .set(&ScheduleUpdate {
                month_name: meta.month_name.as_deref(),
                source_filename: meta.source_filename.as_deref(),
            })
            .execute(conn)
            .await?;
        if updated > 0 {
            return Ok((schedule_id, ImportOutcome::Overwritten));
        }
    }

    let id = Uuid::new_v4();
    let month = i32::try_from(meta.period.month()).map_err(|_| out_of_range("month"))?;
    diesel::insert_into(schedules::table)
        .values(&NewScheduleRow {
            id,
            month,
            year: meta.period.year(),
            month_name: meta.month_name.as_deref(),
            source_filename: meta.source_filename.as_deref(),
        })
        .execute(conn)
        .await?;
    Ok((ScheduleId::from_uuid(id), ImportOutcome::Created))
}

async fn upsert_employees(
    conn: &mut AsyncPgConnection,
    drafts: &[EmployeeDraft],
) -> Result<usize, DieselError> {
    let rows: Vec<NewEmployeeRow<'_>> = drafts
        .iter()
        .map(|draft| NewEmployeeRow {
            id: Uuid::new_v4(),
            matricula: draft.matricula.as_ref(),
            name: draft.name.as_str(),
        })
        .collect();
    let mut written = 0;
    for chunk in rows.chunks(INSERT_CHUNK) {
        written += diesel::insert_into(employees::table)
            .values(chunk)
            .on_conflict(employees::matricula)
            .do_update()
            .set(employees::name.eq(excluded(employees::name)))
            .execute(conn)
            .await?;
    }
    Ok(written)
}

async fn load_employee_ids(
    conn: &mut AsyncPgConnection,
    drafts: &[EmployeeDraft],
) -> Result<HashMap<Matricula, EmployeeId>, DieselError> {
    let keys: Vec<&str> = drafts.iter().map(|draft| draft.matricula.as_ref()).collect();
    let rows: Vec<(Uuid, String)> = employees::table
        .filter(employees::matricula.eq_any(keys))
        .select((employees::id, employees::matricula))
        .load(conn)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(id, matricula)| {
            Matricula::new(matricula)
                .ok()
                .map(|matricula| (matricula, EmployeeId::from_uuid(id)))
        })
        .collect())
}

async fn upsert_assignments(
    conn: &mut AsyncPgConnection,
    rows: &[NewAssignment],
) -> Result<usize, DieselError> {
    let rows = rows
        .iter()
        .map(|row| -> Result<NewAssignmentRow<'_>, DieselError> {
            Ok(NewAssignmentRow {
                id: Uuid::new_v4(),
                schedule_id: *row.schedule_id.as_uuid(),
                employee_id: *row.employee_id.as_uuid(),
                sector: row.sector.as_str(),
                role: row.role.as_deref(),
                shift_hours: row.shift_hours.as_deref(),
                day: i32::try_from(row.day).map_err(|_| out_of_range("day"))?,
                code: row.code.as_str(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let mut written = 0;
    for chunk in rows.chunks(INSERT_CHUNK) {
        written += diesel::insert_into(assignments::table)
            .values(chunk)
            .on_conflict((
                assignments::schedule_id,
                assignments::employee_id,
                assignments::sector,
                assignments::day,
            ))
            .do_update()
            .set((
                assignments::code.eq(excluded(assignments::code)),
                assignments::role.eq(excluded(assignments::role)),
                assignments::shift_hours.eq(excluded(assignments::shift_hours)),
            ))
            .execute(conn)
            .await?;
    }
    Ok(written)
}

async fn upsert_legend(
    conn: &mut AsyncPgConnection,
    legend: &[CodeLegendEntry],
) -> Result<usize, DieselError> {
    if legend.is_empty() {
        return Ok(0);
    }
    let rows: Vec<CodeLegendRow> = legend.iter().map(CodeLegendRow::from).collect();
    diesel::insert_into(code_legend::table)
        .values(&rows)
        .on_conflict(code_legend::code)
        .do_update()
        .set(code_legend::description.eq(excluded(code_legend::description)))
        .execute(conn)
        .await
}

#[async_trait]
impl RosterImportRepository for DieselRosterImportRepository {
    async fn apply(&self, plan: &ImportPlan) -> Result<ImportReport, RosterImportRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let period = plan.period();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let (schedule_id, outcome) = write_schedule(conn, plan).await?;
                let employees_upserted = upsert_employees(conn, &plan.employees).await?;
                let ids = load_employee_ids(conn, &plan.employees).await?;
                let resolved = resolve_assignments(schedule_id, &plan.assignments, &ids);
                let assignments_written = upsert_assignments(conn, &resolved.rows).await?;
                let legend_entries = upsert_legend(conn, &plan.legend).await?;
                Ok(ImportReport {
                    schedule_id,
                    period,
                    outcome,
                    assignments_written,
                    employees_upserted,
                    legend_entries,
                    unresolved_matriculas: resolved.unresolved,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(|error| map_import_error(error, period))
    }
}
