//! Read-side port for schedules, assignments, employees and the legend.

use async_trait::async_trait;

use crate::domain::{
    AssignmentRecord, CodeLegendEntry, CoworkerLookupKey, Employee, EmployeeId, MonthYear,
    Schedule, ScheduleId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading roster data.
    pub enum RosterRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "roster read connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "roster read query failed: {message}",
    }
}

/// Roster reads. Every list is deterministically ordered.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Schedule of a month, if imported.
    async fn find_schedule(
        &self,
        period: MonthYear,
    ) -> Result<Option<Schedule>, RosterRepositoryError>;

    /// All rows of a schedule joined with employees, ordered by day, sector
    /// and employee name.
    async fn schedule_assignments(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<AssignmentRecord>, RosterRepositoryError>;

    /// One employee's rows of a schedule, ordered by day.
    async fn employee_assignments(
        &self,
        schedule_id: ScheduleId,
        employee_id: EmployeeId,
    ) -> Result<Vec<AssignmentRecord>, RosterRepositoryError>;

    /// Rows sharing the key's schedule, sector and day, minus its employee.
    async fn coworkers(
        &self,
        key: &CoworkerLookupKey,
    ) -> Result<Vec<AssignmentRecord>, RosterRepositoryError>;

    /// Employee directory ordered by name.
    async fn list_employees(&self) -> Result<Vec<Employee>, RosterRepositoryError>;

    /// One employee by id.
    async fn find_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<Employee>, RosterRepositoryError>;

    /// Legend ordered by code.
    async fn legend(&self) -> Result<Vec<CodeLegendEntry>, RosterRepositoryError>;
}

/// Empty roster used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRosterRepository;

#[async_trait]
impl RosterRepository for FixtureRosterRepository {
    async fn find_schedule(
        &self,
        _period: MonthYear,
    ) -> Result<Option<Schedule>, RosterRepositoryError> {
        Ok(None)
    }

    async fn schedule_assignments(
        &self,
        _schedule_id: ScheduleId,
    ) -> Result<Vec<AssignmentRecord>, RosterRepositoryError> {
        Ok(Vec::new())
    }

    async fn employee_assignments(
        &self,
        _schedule_id: ScheduleId,
        _employee_id: EmployeeId,
    ) -> Result<Vec<AssignmentRecord>, RosterRepositoryError> {
        Ok(Vec::new())
    }

    async fn coworkers(
        &self,
        _key: &CoworkerLookupKey,
    ) -> Result<Vec<AssignmentRecord>, RosterRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, RosterRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_employee(
        &self,
        _employee_id: EmployeeId,
    ) -> Result<Option<Employee>, RosterRepositoryError> {
        Ok(None)
    }

    async fn legend(&self) -> Result<Vec<CodeLegendEntry>, RosterRepositoryError> {
        Ok(Vec::new())
    }
}
