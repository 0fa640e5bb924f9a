//! One employee's month: code summary, work/off counts, next work day and a
//! per-day timeline.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{
    AssignmentRecord, CoworkerLookupKey, DayStatus, Employee, MonthYear, Schedule,
};

/// No schedule stored for the viewed month.
pub const NO_SCHEDULE: &str = "No schedule for the selected month and year.";
/// The employee has no rows in the schedule.
pub const NO_ENTRIES: &str = "No entries for this employee in the selected month.";
/// No work row left to point at.
pub const NO_NEXT_WORK_DAY: &str = "No upcoming work day in the selected month.";
/// Timeline day without any row.
pub const NO_RECORD: &str = "No record.";
/// Search text was empty.
pub const NO_EMPLOYEE_SELECTED: &str = "Select an employee.";
/// Search text matched nobody.
pub const EMPLOYEE_NOT_FOUND: &str = "No employee matches the search text.";

/// Day from which upcoming work is searched.
///
/// Today's day of month when `today` lies inside `period`, otherwise 1.
pub fn current_day(period: MonthYear, today: NaiveDate) -> u32 {
    if period.contains(today) {
        today.day()
    } else {
        1
    }
}

/// First work row on or after `from_day`, else the first work row at all.
///
/// `rows` must be sorted by day. Off rows are never returned.
pub fn next_work_day(rows: &[AssignmentRecord], from_day: u32) -> Option<&AssignmentRecord> {
    let mut work = rows.iter().filter(|row| row.status() == DayStatus::Work);
    let first = work.clone().next();
    work.find(|row| row.day >= from_day).or(first)
}

/// Frequency of one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeCount {
    /// Code.
    pub code: String,
    /// Occurrences in the month.
    pub count: usize,
}

/// Upcoming work day pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextWorkDay {
    /// Day of month.
    pub day: u32,
    /// Code worked.
    pub code: String,
    /// Sector worked.
    pub sector: String,
    /// Display text, e.g. `Next work day: 5/3/2024 (M)`.
    pub label: String,
}

/// One assignment on a timeline day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineAssignment {
    /// Sector.
    pub sector: String,
    /// Code.
    pub code: String,
    /// Role, when printed.
    pub role: Option<String>,
    /// Shift hours, when printed.
    pub shift_hours: Option<String>,
    /// Work or off.
    pub status: DayStatus,
    /// Present on work assignments only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coworker_lookup: Option<CoworkerLookupKey>,
}

/// One day of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    /// Day of month.
    pub day: u32,
    /// Rows of the day, possibly several sectors.
    pub assignments: Vec<TimelineAssignment>,
    /// [`NO_RECORD`] when the day is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Summary of one employee's month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSchedule {
    /// Schedule viewed.
    pub schedule: Schedule,
    /// Employee viewed.
    pub employee: Employee,
    /// Code frequencies sorted by code.
    pub count_by_code: Vec<CodeCount>,
    /// Rows with a work code.
    pub work_days: usize,
    /// Rows with a non-work code.
    pub off_days: usize,
    /// Upcoming work day, if any.
    pub next_work_day: Option<NextWorkDay>,
    /// [`NO_NEXT_WORK_DAY`] when there is none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_work_day_message: Option<String>,
    /// Days 1..=days_in_month.
    pub timeline: Vec<TimelineEntry>,
}

/// Outcome of the employee projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EmployeeScheduleView {
    /// Nothing stored for the period.
    NoSchedule {
        /// Viewed period.
        period: MonthYear,
        /// [`NO_SCHEDULE`].
        message: String,
    },
    /// Schedule exists but the employee has no rows.
    NoEntries {
        /// Viewed period.
        period: MonthYear,
        /// [`NO_ENTRIES`].
        message: String,
    },
    /// Full summary.
    Summary(Box<EmployeeSchedule>),
}

impl EmployeeScheduleView {
    /// Outcome when no schedule exists for `period`.
    pub fn no_schedule(period: MonthYear) -> Self {
        Self::NoSchedule {
            period,
            message: NO_SCHEDULE.to_owned(),
        }
    }
}

/// Build the employee projection from the employee's rows of `schedule`.
pub fn summarize(
    schedule: Schedule,
    employee: Employee,
    rows: &[AssignmentRecord],
    today: NaiveDate,
) -> EmployeeScheduleView {
    let period = schedule.period;
    let mut rows: Vec<&AssignmentRecord> = rows
        .iter()
        .filter(|row| row.schedule_id == schedule.id && row.employee_id == employee.id)
        .collect();
    if rows.is_empty() {
        return EmployeeScheduleView::NoEntries {
            period,
            message: NO_ENTRIES.to_owned(),
        };
    }
    rows.sort_by_key(|row| row.day);
    let sorted: Vec<AssignmentRecord> = rows.into_iter().cloned().collect();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &sorted {
        *counts.entry(row.code.as_str()).or_default() += 1;
    }
    let count_by_code = counts
        .into_iter()
        .map(|(code, count)| CodeCount {
            code: code.to_owned(),
            count,
        })
        .collect();
    let work_days = sorted
        .iter()
        .filter(|row| row.status() == DayStatus::Work)
        .count();
    let off_days = sorted.len() - work_days;

    let next = next_work_day(&sorted, current_day(period, today)).map(|row| NextWorkDay {
        day: row.day,
        code: row.code.clone(),
        sector: row.sector.clone(),
        label: format!(
            "Next work day: {}/{}/{} ({})",
            row.day,
            period.month(),
            period.year(),
            row.code
        ),
    });
    let next_work_day_message = next.is_none().then(|| NO_NEXT_WORK_DAY.to_owned());
    let timeline = build_timeline(&schedule, period, &sorted);

    EmployeeScheduleView::Summary(Box::new(EmployeeSchedule {
        schedule,
        employee,
        count_by_code,
        work_days,
        off_days,
        next_work_day: next,
        next_work_day_message,
        timeline,
    }))
}

fn build_timeline(
    schedule: &Schedule,
    period: MonthYear,
    sorted: &[AssignmentRecord],
) -> Vec<TimelineEntry> {
    (1..=period.days_in_month())
        .map(|day| {
            let assignments: Vec<TimelineAssignment> = sorted
                .iter()
                .filter(|row| row.day == day)
                .map(|row| {
                    let status = row.status();
                    TimelineAssignment {
                        sector: row.sector.clone(),
                        code: row.code.clone(),
                        role: row.role.clone(),
                        shift_hours: row.shift_hours.clone(),
                        status,
                        coworker_lookup: (status == DayStatus::Work).then(|| CoworkerLookupKey {
                            schedule_id: schedule.id,
                            sector: row.sector.clone(),
                            day,
                            employee_id: row.employee_id,
                        }),
                    }
                })
                .collect();
            let message = assignments.is_empty().then(|| NO_RECORD.to_owned());
            TimelineEntry {
                day,
                assignments,
                message,
            }
        })
        .collect()
}

/// Result of resolving the employee picker text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeLookup {
    /// Matched an employee.
    Found(Employee),
    /// The text was blank.
    NotSelected,
    /// The text matched nobody.
    NotFound,
}

impl EmployeeLookup {
    /// Empty-state text for misses.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Found(_) => None,
            Self::NotSelected => Some(NO_EMPLOYEE_SELECTED),
            Self::NotFound => Some(EMPLOYEE_NOT_FOUND),
        }
    }
}

/// Resolve picker text of the form `"<matricula> - <name>"`.
///
/// The part before the first `-` is tried as a matricula; otherwise the full
/// text is compared case-insensitively with each employee's label.
///
/// # Examples
/// ```
/// use roster::domain::{find_employee_by_search, Employee, EmployeeId, EmployeeLookup, Matricula};
///
/// let ana = Employee {
///     id: EmployeeId::random(),
///     matricula: Matricula::new("123").unwrap(),
///     name: "Ana".into(),
/// };
/// let directory = [ana.clone()];
/// assert_eq!(find_employee_by_search("123 - whatever", &directory), EmployeeLookup::Found(ana));
/// assert_eq!(find_employee_by_search("  ", &directory), EmployeeLookup::NotSelected);
/// ```
pub fn find_employee_by_search(text: &str, employees: &[Employee]) -> EmployeeLookup {
    let raw = text.trim();
    if raw.is_empty() {
        return EmployeeLookup::NotSelected;
    }
    let first_part = raw.split('-').next().unwrap_or_default().trim();
    let by_matricula = employees
        .iter()
        .find(|employee| employee.matricula.as_ref() == first_part);
    let found = by_matricula.or_else(|| {
        let wanted = raw.to_lowercase();
        employees
            .iter()
            .find(|employee| employee.search_label().to_lowercase() == wanted)
    });
    found.cloned().map_or(EmployeeLookup::NotFound, EmployeeLookup::Found)
}
