//! PostgreSQL-backed roster reads.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RosterRepository, RosterRepositoryError};
use crate::domain::{
    AssignmentRecord, CodeLegendEntry, CoworkerLookupKey, Employee, EmployeeId, MonthYear,
    Schedule, ScheduleId,
};

use super::error_mapping::{map_diesel_error, pool_message};
use super::models::{AssignmentJoinRow, CodeLegendRow, EmployeeRow, ScheduleRow};
use super::pool::{DbPool, PoolError};
use super::schema::{assignments, code_legend, employees, schedules};

type AssignmentColumns = (
    assignments::schedule_id,
    assignments::employee_id,
    assignments::sector,
    assignments::role,
    assignments::shift_hours,
    assignments::day,
    assignments::code,
    employees::name,
    employees::matricula,
);

const ASSIGNMENT_COLUMNS: AssignmentColumns = (
    assignments::schedule_id,
    assignments::employee_id,
    assignments::sector,
    assignments::role,
    assignments::shift_hours,
    assignments::day,
    assignments::code,
    employees::name,
    employees::matricula,
);

/// Diesel-backed implementation of [`RosterRepository`].
#[derive(Clone)]
pub struct DieselRosterRepository {
    pool: DbPool,
}

impl DieselRosterRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RosterRepositoryError {
    RosterRepositoryError::connection(pool_message(error))
}

fn map_query_error(error: diesel::result::Error) -> RosterRepositoryError {
    map_diesel_error(
        error,
        |message| RosterRepositoryError::query(message),
        |message| RosterRepositoryError::connection(message),
    )
}

fn to_records(rows: Vec<AssignmentJoinRow>) -> Result<Vec<AssignmentRecord>, RosterRepositoryError> {
    rows.into_iter()
        .map(AssignmentRecord::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|message| RosterRepositoryError::query(message))
}

fn db_int(value: u32, what: &str) -> Result<i32, RosterRepositoryError> {
    i32::try_from(value).map_err(|_| RosterRepositoryError::query(format!("{what} out of range")))
}

#[async_trait]
impl RosterRepository for DieselRosterRepository {
    async fn find_schedule(
        &self,
        period: MonthYear,
    ) -> Result<Option<Schedule>, RosterRepositoryError> {
        let month = db_int(period.month(), "month")?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = schedules::table
            .filter(schedules::month.eq(month))
            .filter(schedules::year.eq(period.year()))
            .select(ScheduleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;
        row.map(Schedule::try_from)
            .transpose()
            .map_err(|message| RosterRepositoryError::query(message))
    }

    async fn schedule_assignments(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<AssignmentRecord>, RosterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AssignmentJoinRow> = assignments::table
            .inner_join(employees::table)
            .filter(assignments::schedule_id.eq(schedule_id.as_uuid()))
            .order((
                assignments::day.asc(),
                assignments::sector.asc(),
                employees::name.asc(),
            ))
            .select(ASSIGNMENT_COLUMNS)
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;
        to_records(rows)
    }

    async fn employee_assignments(
        &self,
        schedule_id: ScheduleId,
        employee_id: EmployeeId,
    ) -> Result<Vec<AssignmentRecord>, RosterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AssignmentJoinRow> = assignments::table
            .inner_join(employees::table)
            .filter(assignments::schedule_id.eq(schedule_id.as_uuid()))
            .filter(assignments::employee_id.eq(employee_id.as_uuid()))
            .order((assignments::day.asc(), assignments::sector.asc()))
            .select(ASSIGNMENT_COLUMNS)
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;
        to_records(rows)
    }

    async fn coworkers(
        &self,
        key: &CoworkerLookupKey,
    ) -> Result<Vec<AssignmentRecord>, RosterRepositoryError> {
        let day = db_int(key.day, "day")?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AssignmentJoinRow> = assignments::table
            .inner_join(employees::table)
            .filter(assignments::schedule_id.eq(key.schedule_id.as_uuid()))
            .filter(assignments::sector.eq(&key.sector))
            .filter(assignments::day.eq(day))
            .filter(assignments::employee_id.ne(key.employee_id.as_uuid()))
            .order(employees::name.asc())
            .select(ASSIGNMENT_COLUMNS)
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;
        to_records(rows)
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, RosterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = employees::table
            .order((employees::name.asc(), employees::matricula.asc()))
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;
        rows.into_iter()
            .map(Employee::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|message| RosterRepositoryError::query(message))
    }

    async fn find_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<Employee>, RosterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = employees::table
            .find(*employee_id.as_uuid())
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;
        row.map(Employee::try_from)
            .transpose()
            .map_err(|message| RosterRepositoryError::query(message))
    }

    async fn legend(&self) -> Result<Vec<CodeLegendEntry>, RosterRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = code_legend::table
            .order(code_legend::code.asc())
            .select(CodeLegendRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;
        Ok(rows.into_iter().map(CodeLegendEntry::from).collect())
    }
}
