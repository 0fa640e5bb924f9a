//! Read-side roster service.
//!
//! Combines the roster repository with the pure projections in
//! [`crate::domain::calendar`], [`crate::domain::employee_schedule`] and
//! [`crate::domain::coworkers`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{RosterQuery, RosterRepository, RosterRepositoryError};
use crate::domain::{
    AssignmentRecord, CalendarFilters, CalendarMonth, CodeLegendEntry, CoworkerList,
    CoworkerLookupKey, DayDetail, Employee, EmployeeId, EmployeeLookup, EmployeeScheduleView,
    Error, FilterOptions, MonthYear, Schedule, day_detail, find_employee_by_search, project_month,
    summarize,
};

/// Implements [`RosterQuery`] over a [`RosterRepository`].
#[derive(Clone)]
pub struct RosterQueryService<R: ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> RosterQueryService<R> {
    /// Create the service. `clock` decides what "today" is.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

pub(crate) fn map_roster_error(error: RosterRepositoryError) -> Error {
    match error {
        RosterRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("roster repository unavailable: {message}"))
        }
        RosterRepositoryError::Query { message } => {
            Error::storage(format!("roster repository error: {message}"))
        }
    }
}

impl<R> RosterQueryService<R>
where
    R: RosterRepository + ?Sized,
{
    async fn month_rows(
        &self,
        period: MonthYear,
    ) -> Result<(Option<Schedule>, Vec<AssignmentRecord>), Error> {
        let schedule = self
            .repo
            .find_schedule(period)
            .await
            .map_err(map_roster_error)?;
        let rows = match &schedule {
            Some(schedule) => self
                .repo
                .schedule_assignments(schedule.id)
                .await
                .map_err(map_roster_error)?,
            None => Vec::new(),
        };
        Ok((schedule, rows))
    }
}

#[async_trait]
impl<R> RosterQuery for RosterQueryService<R>
where
    R: RosterRepository + ?Sized,
{
    async fn calendar(
        &self,
        period: MonthYear,
        filters: CalendarFilters,
    ) -> Result<CalendarMonth, Error> {
        let (schedule, rows) = self.month_rows(period).await?;
        Ok(project_month(period, schedule, &rows, filters))
    }

    async fn day_detail(
        &self,
        period: MonthYear,
        day: u32,
        filters: CalendarFilters,
    ) -> Result<DayDetail, Error> {
        let day = period
            .validate_day(day)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let (_, rows) = self.month_rows(period).await?;
        let filters = filters.reconcile(&FilterOptions::from_rows(&rows));
        Ok(day_detail(day, &rows, &filters))
    }

    async fn employees(&self) -> Result<Vec<Employee>, Error> {
        self.repo.list_employees().await.map_err(map_roster_error)
    }

    async fn search_employee(&self, text: String) -> Result<EmployeeLookup, Error> {
        if text.trim().is_empty() {
            return Ok(EmployeeLookup::NotSelected);
        }
        let employees = self.employees().await?;
        Ok(find_employee_by_search(&text, &employees))
    }

    async fn employee_schedule(
        &self,
        employee_id: EmployeeId,
        period: MonthYear,
    ) -> Result<EmployeeScheduleView, Error> {
        let employee = self
            .repo
            .find_employee(employee_id)
            .await
            .map_err(map_roster_error)?
            .ok_or_else(|| Error::not_found(format!("employee {employee_id} not found")))?;
        let Some(schedule) = self
            .repo
            .find_schedule(period)
            .await
            .map_err(map_roster_error)?
        else {
            return Ok(EmployeeScheduleView::no_schedule(period));
        };
        let rows = self
            .repo
            .employee_assignments(schedule.id, employee.id)
            .await
            .map_err(map_roster_error)?;
        let today = self.clock.local().date_naive();
        Ok(summarize(schedule, employee, &rows, today))
    }

    async fn coworkers(&self, key: CoworkerLookupKey) -> Result<CoworkerList, Error> {
        let rows = self.repo.coworkers(&key).await.map_err(map_roster_error)?;
        Ok(CoworkerList::from_rows(key, &rows))
    }

    async fn legend(&self) -> Result<Vec<CodeLegendEntry>, Error> {
        self.repo.legend().await.map_err(map_roster_error)
    }
}
