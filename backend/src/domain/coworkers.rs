//! Coworkers sharing a sector on a given day.

use serde::{Deserialize, Serialize};

use super::{AssignmentRecord, EmployeeId, ScheduleId};

/// Empty-state text for a coworker lookup.
pub const NO_COWORKERS: &str = "No coworkers found for this day and sector.";

/// Identifies one work assignment whose coworkers can be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoworkerLookupKey {
    /// Schedule holding the assignment.
    pub schedule_id: ScheduleId,
    /// Sector of the assignment.
    pub sector: String,
    /// Day of month.
    pub day: u32,
    /// Employee to leave out of the list.
    pub employee_id: EmployeeId,
}

/// Another employee on the same schedule, sector and day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coworker {
    /// Employee identifier.
    pub employee_id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Business identifier.
    pub matricula: String,
    /// Code worked that day.
    pub code: String,
}

/// Result of a coworker lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoworkerList {
    /// Lookup that produced the list.
    pub key: CoworkerLookupKey,
    /// Matching coworkers.
    pub coworkers: Vec<Coworker>,
    /// Empty-state text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CoworkerList {
    /// Keep rows on the key's schedule, sector and day, minus the employee.
    ///
    /// Rows are filtered here as well as in storage so any row source can be
    /// passed in.
    pub fn from_rows(key: CoworkerLookupKey, rows: &[AssignmentRecord]) -> Self {
        let coworkers: Vec<Coworker> = rows
            .iter()
            .filter(|row| {
                row.schedule_id == key.schedule_id
                    && row.sector == key.sector
                    && row.day == key.day
                    && row.employee_id != key.employee_id
            })
            .map(|row| Coworker {
                employee_id: row.employee_id,
                name: row.employee_name.clone(),
                matricula: row.matricula.clone(),
                code: row.code.clone(),
            })
            .collect();
        let message = coworkers.is_empty().then(|| NO_COWORKERS.to_owned());
        Self {
            key,
            coworkers,
            message,
        }
    }
}
