//! Import reconciliation: turns a validated payload into the rows the storage
//! adapter writes.
//!
//! The plan is pure data. Adapters execute it inside one transaction:
//! resolve the target schedule, upsert [`ImportPlan::employees`], read back
//! the ids, call [`resolve_assignments`], upsert the rows and the legend.

use std::collections::HashMap;

use serde::Serialize;

use super::{
    CodeLegendEntry, EmployeeId, Matricula, MonthYear, ParsedPayload, PayloadMetadata, ScheduleId,
};

/// Employee row to upsert on matricula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDraft {
    /// Business key.
    pub matricula: Matricula,
    /// Name written on upsert.
    pub name: String,
}

/// Collapse repeated matriculas, keeping the last name seen.
///
/// Output order follows each matricula's first appearance.
pub fn dedupe_employees(payload: &ParsedPayload) -> Vec<EmployeeDraft> {
    let mut drafts: Vec<EmployeeDraft> = Vec::new();
    let mut index: HashMap<Matricula, usize> = HashMap::new();
    for employee in payload.sectors.iter().flat_map(|s| s.employees.iter()) {
        match index.get(&employee.matricula) {
            Some(&slot) => {
                if let Some(draft) = drafts.get_mut(slot) {
                    draft.name.clone_from(&employee.name);
                }
            }
            None => {
                index.insert(employee.matricula.clone(), drafts.len());
                drafts.push(EmployeeDraft {
                    matricula: employee.matricula.clone(),
                    name: employee.name.clone(),
                });
            }
        }
    }
    drafts
}

/// Assignment keyed by matricula, before employee ids are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDraft {
    /// Employee business key.
    pub matricula: Matricula,
    /// Sector name.
    pub sector: String,
    /// Role.
    pub role: Option<String>,
    /// Shift hours.
    pub shift_hours: Option<String>,
    /// Day of month.
    pub day: u32,
    /// Trimmed code.
    pub code: String,
}

/// Flatten every sector/employee/day entry in document order.
pub fn assignment_drafts(payload: &ParsedPayload) -> Vec<AssignmentDraft> {
    payload
        .sectors
        .iter()
        .flat_map(|sector| {
            sector.employees.iter().flat_map(move |employee| {
                employee.days.iter().map(move |entry| AssignmentDraft {
                    matricula: employee.matricula.clone(),
                    sector: sector.name.clone(),
                    role: employee.role.clone(),
                    shift_hours: employee.shift_hours.clone(),
                    day: entry.day,
                    code: entry.code.clone(),
                })
            })
        })
        .collect()
}

/// Assignment row ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    /// Target schedule.
    pub schedule_id: ScheduleId,
    /// Resolved employee.
    pub employee_id: EmployeeId,
    /// Sector.
    pub sector: String,
    /// Role.
    pub role: Option<String>,
    /// Shift hours.
    pub shift_hours: Option<String>,
    /// Day of month.
    pub day: u32,
    /// Code.
    pub code: String,
}

impl NewAssignment {
    /// `(schedule_id, employee_id, sector, day)`.
    pub fn natural_key(&self) -> (ScheduleId, EmployeeId, &str, u32) {
        (self.schedule_id, self.employee_id, self.sector.as_str(), self.day)
    }
}

/// Rows to write plus the matriculas that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedAssignments {
    /// Unique on the natural key.
    pub rows: Vec<NewAssignment>,
    /// Distinct unresolved matriculas, first-appearance order.
    pub unresolved: Vec<Matricula>,
}

/// Attach employee ids and collapse natural-key repeats, last one wins.
pub fn resolve_assignments(
    schedule_id: ScheduleId,
    drafts: &[AssignmentDraft],
    employee_ids: &HashMap<Matricula, EmployeeId>,
) -> ResolvedAssignments {
    let mut resolved = ResolvedAssignments::default();
    let mut slots: HashMap<(EmployeeId, String, u32), usize> = HashMap::new();
    for draft in drafts {
        let Some(&employee_id) = employee_ids.get(&draft.matricula) else {
            if !resolved.unresolved.contains(&draft.matricula) {
                resolved.unresolved.push(draft.matricula.clone());
            }
            continue;
        };
        let row = NewAssignment {
            schedule_id,
            employee_id,
            sector: draft.sector.clone(),
            role: draft.role.clone(),
            shift_hours: draft.shift_hours.clone(),
            day: draft.day,
            code: draft.code.clone(),
        };
        let key = (employee_id, draft.sector.clone(), draft.day);
        match slots.get(&key) {
            Some(&slot) => {
                if let Some(existing) = resolved.rows.get_mut(slot) {
                    *existing = row;
                }
            }
            None => {
                slots.insert(key, resolved.rows.len());
                resolved.rows.push(row);
            }
        }
    }
    resolved
}

/// Where the payload lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportTarget {
    /// Insert a new schedule row.
    Create,
    /// Clear and reuse an existing schedule.
    Overwrite(ScheduleId),
}

/// Everything the storage adapter needs for one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    /// Target schedule.
    pub target: ImportTarget,
    /// Period and descriptive fields.
    pub metadata: PayloadMetadata,
    /// Deduplicated employees.
    pub employees: Vec<EmployeeDraft>,
    /// Flattened assignments keyed by matricula.
    pub assignments: Vec<AssignmentDraft>,
    /// Legend entries to upsert.
    pub legend: Vec<CodeLegendEntry>,
}

impl ImportPlan {
    /// Derive the plan from a validated payload.
    pub fn build(payload: &ParsedPayload, target: ImportTarget) -> Self {
        Self {
            target,
            metadata: payload.metadata.clone(),
            employees: dedupe_employees(payload),
            assignments: assignment_drafts(payload),
            legend: payload.legend.clone(),
        }
    }

    /// Period being imported.
    pub fn period(&self) -> MonthYear {
        self.metadata.period
    }
}

/// How the schedule was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    /// A new schedule was inserted.
    Created,
    /// An existing schedule was replaced.
    Overwritten,
}

/// Summary returned once an import commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Schedule written.
    pub schedule_id: ScheduleId,
    /// Imported period; clients refresh their filters to it.
    pub period: MonthYear,
    /// Created or overwritten.
    pub outcome: ImportOutcome,
    /// Assignment rows upserted.
    pub assignments_written: usize,
    /// Employee rows upserted.
    pub employees_upserted: usize,
    /// Legend rows upserted.
    pub legend_entries: usize,
    /// Matriculas whose rows were skipped.
    pub unresolved_matriculas: Vec<Matricula>,
}

impl ImportReport {
    /// Status line for the import panel.
    pub fn message(&self) -> String {
        let verb = match self.outcome {
            ImportOutcome::Created => "saved",
            ImportOutcome::Overwritten => "overwritten",
        };
        format!(
            "Schedule {} {verb}: {} assignments written.",
            self.period, self.assignments_written
        )
    }
}
