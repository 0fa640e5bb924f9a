//! Driving port for the read-only roster views.
//!
//! Lookup misses (no schedule, no rows, no coworkers) are successful results
//! carrying a message; only storage failures are errors.

use async_trait::async_trait;

use crate::domain::{
    CalendarFilters, CalendarMonth, CodeLegendEntry, CoworkerList, CoworkerLookupKey, DayDetail,
    Employee, EmployeeId, EmployeeLookup, EmployeeScheduleView, Error, MonthYear,
};

/// Read use-cases backing the calendar, employee and legend endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterQuery: Send + Sync {
    /// Calendar cells for a month under `filters`.
    async fn calendar(
        &self,
        period: MonthYear,
        filters: CalendarFilters,
    ) -> Result<CalendarMonth, Error>;

    /// Sector-grouped detail of one day.
    async fn day_detail(
        &self,
        period: MonthYear,
        day: u32,
        filters: CalendarFilters,
    ) -> Result<DayDetail, Error>;

    /// Employee directory.
    async fn employees(&self) -> Result<Vec<Employee>, Error>;

    /// Resolve picker text to an employee.
    async fn search_employee(&self, text: String) -> Result<EmployeeLookup, Error>;

    /// One employee's month.
    async fn employee_schedule(
        &self,
        employee_id: EmployeeId,
        period: MonthYear,
    ) -> Result<EmployeeScheduleView, Error>;

    /// Coworkers for a work assignment.
    async fn coworkers(&self, key: CoworkerLookupKey) -> Result<CoworkerList, Error>;

    /// Code legend.
    async fn legend(&self) -> Result<Vec<CodeLegendEntry>, Error>;
}
