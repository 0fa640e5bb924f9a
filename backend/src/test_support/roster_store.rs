//! In-memory roster storage with all-or-nothing imports.
//!
//! Implements both storage ports over one shared state. `apply` works on a
//! copy and swaps it in only when every step succeeds, mirroring the
//! transaction the Diesel adapter runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    RosterImportRepository, RosterImportRepositoryError, RosterRepository, RosterRepositoryError,
};
use crate::domain::{
    AssignmentRecord, CodeLegendEntry, CoworkerLookupKey, Employee, EmployeeId, ImportOutcome,
    ImportPlan, ImportReport, ImportTarget, Matricula, MonthYear, Schedule, ScheduleId,
    resolve_assignments,
};

#[derive(Debug, Clone)]
struct StoredAssignment {
    schedule_id: ScheduleId,
    employee_id: EmployeeId,
    sector: String,
    role: Option<String>,
    shift_hours: Option<String>,
    day: u32,
    code: String,
}

#[derive(Debug, Clone, Default)]
struct State {
    schedules: Vec<Schedule>,
    employees: Vec<Employee>,
    assignments: Vec<StoredAssignment>,
    legend: BTreeMap<String, String>,
}

impl State {
    fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    fn record(&self, row: &StoredAssignment) -> Option<AssignmentRecord> {
        self.employee(row.employee_id).map(|employee| AssignmentRecord {
            schedule_id: row.schedule_id,
            employee_id: row.employee_id,
            employee_name: employee.name.clone(),
            matricula: employee.matricula.to_string(),
            sector: row.sector.clone(),
            role: row.role.clone(),
            shift_hours: row.shift_hours.clone(),
            day: row.day,
            code: row.code.clone(),
        })
    }

    fn records(&self, keep: impl Fn(&StoredAssignment) -> bool) -> Vec<AssignmentRecord> {
        let mut rows: Vec<AssignmentRecord> = self
            .assignments
            .iter()
            .filter(|row| keep(row))
            .filter_map(|row| self.record(row))
            .collect();
        rows.sort_by(|a, b| {
            (a.day, &a.sector, &a.employee_name).cmp(&(b.day, &b.sector, &b.employee_name))
        });
        rows
    }

    fn write_schedule(
        &mut self,
        plan: &ImportPlan,
    ) -> Result<(ScheduleId, ImportOutcome), RosterImportRepositoryError> {
        let meta = &plan.metadata;
        if let ImportTarget::Overwrite(id) = plan.target {
            if let Some(schedule) = self.schedules.iter_mut().find(|s| s.id == id) {
                schedule.month_name.clone_from(&meta.month_name);
                schedule.source_filename.clone_from(&meta.source_filename);
                self.assignments.retain(|row| row.schedule_id != id);
                return Ok((id, ImportOutcome::Overwritten));
            }
        }
        if self.schedules.iter().any(|s| s.period == meta.period) {
            return Err(RosterImportRepositoryError::schedule_exists(
                meta.period.month(),
                meta.period.year(),
            ));
        }
        let id = ScheduleId::random();
        self.schedules.push(Schedule {
            id,
            period: meta.period,
            month_name: meta.month_name.clone(),
            source_filename: meta.source_filename.clone(),
        });
        Ok((id, ImportOutcome::Created))
    }

    fn upsert_employees(&mut self, plan: &ImportPlan) -> HashMap<Matricula, EmployeeId> {
        for draft in &plan.employees {
            match self
                .employees
                .iter_mut()
                .find(|employee| employee.matricula == draft.matricula)
            {
                Some(existing) => existing.name.clone_from(&draft.name),
                None => self.employees.push(Employee {
                    id: EmployeeId::random(),
                    matricula: draft.matricula.clone(),
                    name: draft.name.clone(),
                }),
            }
        }
        self.employees
            .iter()
            .map(|employee| (employee.matricula.clone(), employee.id))
            .collect()
    }
}

/// Shared in-memory roster.
#[derive(Debug, Default)]
pub struct InMemoryRosterStore {
    state: Mutex<State>,
    fail_after_employees: Mutex<Option<String>>,
}

impl InMemoryRosterStore {
    /// Empty store with no schedules, employees or legend entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next import fail after employees were written, to observe
    /// rollback.
    pub fn fail_next_import(&self, message: impl Into<String>) {
        if let Ok(mut slot) = self.fail_after_employees.lock() {
            *slot = Some(message.into());
        }
    }

    /// Number of stored schedules.
    pub fn schedule_count(&self) -> usize {
        self.state.lock().map_or(0, |state| state.schedules.len())
    }

    /// Number of stored assignment rows across all schedules.
    pub fn assignment_count(&self) -> usize {
        self.state.lock().map_or(0, |state| state.assignments.len())
    }

    fn read(&self) -> Result<MutexGuard<'_, State>, RosterRepositoryError> {
        self.state
            .lock()
            .map_err(|_| RosterRepositoryError::connection("in-memory store poisoned"))
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterStore {
    async fn find_schedule(
        &self,
        period: MonthYear,
    ) -> Result<Option<Schedule>, RosterRepositoryError> {
        let state = self.read()?;
        Ok(state.schedules.iter().find(|s| s.period == period).cloned())
    }

    async fn schedule_assignments(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<AssignmentRecord>, RosterRepositoryError> {
        Ok(self.read()?.records(|row| row.schedule_id == schedule_id))
    }

    async fn employee_assignments(
        &self,
        schedule_id: ScheduleId,
        employee_id: EmployeeId,
    ) -> Result<Vec<AssignmentRecord>, RosterRepositoryError> {
        Ok(self
            .read()?
            .records(|row| row.schedule_id == schedule_id && row.employee_id == employee_id))
    }

    async fn coworkers(
        &self,
        key: &CoworkerLookupKey,
    ) -> Result<Vec<AssignmentRecord>, RosterRepositoryError> {
        Ok(self.read()?.records(|row| {
            row.schedule_id == key.schedule_id
                && row.sector == key.sector
                && row.day == key.day
                && row.employee_id != key.employee_id
        }))
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, RosterRepositoryError> {
        let mut employees = self.read()?.employees.clone();
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees)
    }

    async fn find_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<Employee>, RosterRepositoryError> {
        Ok(self.read()?.employee(employee_id).cloned())
    }

    async fn legend(&self) -> Result<Vec<CodeLegendEntry>, RosterRepositoryError> {
        Ok(self
            .read()?
            .legend
            .iter()
            .map(|(code, description)| CodeLegendEntry {
                code: code.clone(),
                description: description.clone(),
            })
            .collect())
    }
}

fn poisoned<T>(_: PoisonError<T>) -> RosterImportRepositoryError {
    RosterImportRepositoryError::connection("in-memory store poisoned")
}

#[async_trait]
impl RosterImportRepository for InMemoryRosterStore {
    async fn apply(&self, plan: &ImportPlan) -> Result<ImportReport, RosterImportRepositoryError> {
        let mut committed = self.state.lock().map_err(poisoned)?;
        let mut draft = committed.clone();

        let (schedule_id, outcome) = draft.write_schedule(plan)?;
        let ids = draft.upsert_employees(plan);
        if let Some(message) = self.fail_after_employees.lock().map_err(poisoned)?.take() {
            return Err(RosterImportRepositoryError::query(message));
        }
        let resolved = resolve_assignments(schedule_id, &plan.assignments, &ids);
        for row in &resolved.rows {
            let stored = StoredAssignment {
                schedule_id: row.schedule_id,
                employee_id: row.employee_id,
                sector: row.sector.clone(),
                role: row.role.clone(),
                shift_hours: row.shift_hours.clone(),
                day: row.day,
                code: row.code.clone(),
            };
            match draft.assignments.iter_mut().find(|existing| {
                existing.schedule_id == row.schedule_id
                    && existing.employee_id == row.employee_id
                    && existing.sector == row.sector
                    && existing.day == row.day
            }) {
                Some(existing) => *existing = stored,
                None => draft.assignments.push(stored),
            }
        }
        for entry in &plan.legend {
            draft
                .legend
                .insert(entry.code.clone(), entry.description.clone());
        }

        *committed = draft;
        Ok(ImportReport {
            schedule_id,
            period: plan.period(),
            outcome,
            assignments_written: resolved.rows.len(),
            employees_upserted: plan.employees.len(),
            legend_entries: plan.legend.len(),
            unresolved_matriculas: resolved.unresolved,
        })
    }
}
