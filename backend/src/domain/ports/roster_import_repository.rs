//! Write-side port executing an [`ImportPlan`].

use async_trait::async_trait;

use crate::domain::{ImportPlan, ImportReport};

use super::define_port_error;

define_port_error! {
    /// Errors raised while persisting an import.
    pub enum RosterImportRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "roster import connection failed: {message}",
        /// A statement failed; the transaction was rolled back.
        Query { message: String } => "roster import query failed: {message}",
        /// Another schedule for the period was committed first.
        ScheduleExists { month: u32, year: i32 } =>
            "a schedule for {month}/{year} already exists",
    }
}

/// Persists an import atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterImportRepository: Send + Sync {
    /// Run every step of `plan` in one transaction.
    ///
    /// On error nothing is written.
    async fn apply(&self, plan: &ImportPlan) -> Result<ImportReport, RosterImportRepositoryError>;
}

/// Import sink used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRosterImportRepository;

#[async_trait]
impl RosterImportRepository for FixtureRosterImportRepository {
    async fn apply(&self, _plan: &ImportPlan) -> Result<ImportReport, RosterImportRepositoryError> {
        Err(RosterImportRepositoryError::connection(
            "roster storage is not configured",
        ))
    }
}
