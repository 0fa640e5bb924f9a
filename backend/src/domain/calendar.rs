//! Month calendar projection with sector and code filters.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{AssignmentRecord, EmployeeId, MonthYear, Schedule};

/// Day detail message when nothing matches the filters.
pub const NO_ONE_SCHEDULED: &str = "No one scheduled with the current filters.";

/// Keyword meaning "do not filter".
pub const ALL: &str = "ALL";

/// One filter dimension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Pass every row.
    #[default]
    All,
    /// Keep rows equal to the value.
    Only(String),
}

impl Selection {
    /// Read a query value; absent, blank and `ALL` mean no filter.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL) => Self::All,
            Some(value) => Self::Only(value.to_owned()),
        }
    }

    /// Whether `value` passes.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }

    /// Query representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(value) => value.as_str(),
        }
    }

    fn reconcile(self, options: &[String]) -> Self {
        match self {
            Self::Only(value) if options.contains(&value) => Self::Only(value),
            _ => Self::All,
        }
    }
}

impl Serialize for Selection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Sector and code filters, combined with logical AND.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CalendarFilters {
    /// Sector filter.
    pub sector: Selection,
    /// Code filter.
    pub code: Selection,
}

impl CalendarFilters {
    /// Build filters from raw query values.
    pub fn from_query(sector: Option<&str>, code: Option<&str>) -> Self {
        Self {
            sector: Selection::parse(sector),
            code: Selection::parse(code),
        }
    }

    /// Whether `row` passes both filters.
    pub fn matches(&self, row: &AssignmentRecord) -> bool {
        self.sector.accepts(&row.sector) && self.code.accepts(&row.code)
    }

    /// Rows passing the filters, in input order.
    pub fn apply(&self, rows: &[AssignmentRecord]) -> Vec<AssignmentRecord> {
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }

    /// Reset any value that is not among `options` to `ALL`.
    pub fn reconcile(self, options: &FilterOptions) -> Self {
        Self {
            sector: self.sector.reconcile(&options.sectors),
            code: self.code.reconcile(&options.codes),
        }
    }
}

/// Distinct sectors and codes of a month, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterOptions {
    /// Sorted distinct sectors.
    pub sectors: Vec<String>,
    /// Sorted distinct codes.
    pub codes: Vec<String>,
}

impl FilterOptions {
    /// Collect options from unfiltered rows.
    pub fn from_rows(rows: &[AssignmentRecord]) -> Self {
        let sectors: BTreeSet<&str> = rows.iter().map(|row| row.sector.as_str()).collect();
        let codes: BTreeSet<&str> = rows.iter().map(|row| row.code.as_str()).collect();
        Self {
            sectors: sectors.into_iter().map(str::to_owned).collect(),
            codes: codes.into_iter().map(str::to_owned).collect(),
        }
    }
}

/// Match count of one calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    /// Day of month.
    pub day: u32,
    /// Rows passing the filters on this day.
    pub count: usize,
}

/// Calendar grid for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    /// Viewed period.
    pub period: MonthYear,
    /// Stored schedule, when one exists.
    pub schedule: Option<Schedule>,
    /// Length of the month.
    pub days_in_month: u32,
    /// Blank cells before day 1 in a Sunday-first grid.
    pub leading_blanks: u32,
    /// Filters actually applied.
    pub filters: CalendarFilters,
    /// Values offered by the filter pickers.
    pub options: FilterOptions,
    /// One cell per day, zero counts included.
    pub days: Vec<CalendarDay>,
}

/// Project a month of rows into calendar cells.
///
/// Requested filters that do not occur in the month fall back to `ALL`.
pub fn project_month(
    period: MonthYear,
    schedule: Option<Schedule>,
    rows: &[AssignmentRecord],
    requested: CalendarFilters,
) -> CalendarMonth {
    let options = FilterOptions::from_rows(rows);
    let filters = requested.reconcile(&options);
    let days_in_month = period.days_in_month();
    let mut counts = vec![0_usize; days_in_month as usize];
    for row in rows.iter().filter(|row| filters.matches(row)) {
        if let Some(slot) = row
            .day
            .checked_sub(1)
            .and_then(|index| counts.get_mut(index as usize))
        {
            *slot += 1;
        }
    }
    let days = (1..=days_in_month)
        .zip(counts)
        .map(|(day, count)| CalendarDay { day, count })
        .collect();
    CalendarMonth {
        period,
        schedule,
        days_in_month,
        leading_blanks: period.first_weekday(),
        filters,
        options,
        days,
    }
}

/// Person listed under a sector in the day detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPerson {
    /// Employee identifier.
    pub employee_id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Business identifier.
    pub matricula: String,
    /// Code of the day.
    pub code: String,
    /// Role, when printed.
    pub role: Option<String>,
    /// Shift hours, when printed.
    pub shift_hours: Option<String>,
}

/// Sector heading with its people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorGroup {
    /// Sector name.
    pub sector: String,
    /// Matching rows, in input order.
    pub people: Vec<DayPerson>,
}

/// Drill-down for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayDetail {
    /// Selected day.
    pub day: u32,
    /// Sectors in first-appearance order.
    pub groups: Vec<SectorGroup>,
    /// Empty-state text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Group a day's matching rows by sector.
pub fn day_detail(day: u32, rows: &[AssignmentRecord], filters: &CalendarFilters) -> DayDetail {
    let mut groups: Vec<SectorGroup> = Vec::new();
    for row in rows
        .iter()
        .filter(|row| row.day == day && filters.matches(row))
    {
        let person = DayPerson {
            employee_id: row.employee_id,
            name: row.employee_name.clone(),
            matricula: row.matricula.clone(),
            code: row.code.clone(),
            role: row.role.clone(),
            shift_hours: row.shift_hours.clone(),
        };
        match groups.iter_mut().find(|group| group.sector == row.sector) {
            Some(group) => group.people.push(person),
            None => groups.push(SectorGroup {
                sector: row.sector.clone(),
                people: vec![person],
            }),
        }
    }
    let message = groups.is_empty().then(|| NO_ONE_SCHEDULED.to_owned());
    DayDetail {
        day,
        groups,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScheduleId;
    use rstest::{fixture, rstest};

    fn row(sector: &str, name: &str, day: u32, code: &str) -> AssignmentRecord {
        AssignmentRecord {
            schedule_id: ScheduleId::from_uuid(uuid::Uuid::nil()),
            employee_id: EmployeeId::random(),
            employee_name: name.to_owned(),
            matricula: format!("m-{name}"),
            sector: sector.to_owned(),
            role: None,
            shift_hours: None,
            day,
            code: code.to_owned(),
        }
    }

    #[fixture]
    fn rows() -> Vec<AssignmentRecord> {
        vec![
            row("UTI", "Ana", 1, "M"),
            row("ENF", "Bia", 1, "T"),
            row("UTI", "Caio", 1, "F"),
            row("UTI", "Ana", 2, "F"),
            row("ENF", "Bia", 30, "M"),
        ]
    }

    #[fixture]
    fn april() -> MonthYear {
        MonthYear::new(4, 2024).expect("valid period")
    }

    #[rstest]
    #[case(None, "ALL")]
    #[case(Some(""), "ALL")]
    #[case(Some("ALL"), "ALL")]
    #[case(Some(" UTI "), "UTI")]
    fn selection_parses_query_values(#[case] raw: Option<&str>, #[case] expected: &str) {
        assert_eq!(Selection::parse(raw).as_str(), expected);
    }

    #[rstest]
    fn every_day_gets_a_cell(april: MonthYear, rows: Vec<AssignmentRecord>) {
        let month = project_month(april, None, &rows, CalendarFilters::default());
        assert_eq!(month.days.len(), 30);
        assert_eq!(month.leading_blanks, 1);
        assert_eq!(month.days[0], CalendarDay { day: 1, count: 3 });
        assert_eq!(month.days[1].count, 1);
        assert_eq!(month.days[2].count, 0);
        assert_eq!(month.days[29].count, 1);
    }

    #[rstest]
    fn filters_combine_with_and(april: MonthYear, rows: Vec<AssignmentRecord>) {
        let filters = CalendarFilters::from_query(Some("UTI"), Some("F"));
        let month = project_month(april, None, &rows, filters.clone());
        assert_eq!(month.filters, filters);
        assert_eq!(month.days[0].count, 1);
        assert_eq!(month.days[1].count, 1);
        assert_eq!(month.days[29].count, 0);
    }

    #[rstest]
    fn unknown_filter_values_reset_to_all(april: MonthYear, rows: Vec<AssignmentRecord>) {
        let month = project_month(
            april,
            None,
            &rows,
            CalendarFilters::from_query(Some("PED"), Some("M")),
        );
        assert_eq!(month.filters.sector, Selection::All);
        assert_eq!(month.filters.code, Selection::Only("M".to_owned()));
    }

    #[rstest]
    fn options_are_sorted_and_distinct(rows: Vec<AssignmentRecord>) {
        let options = FilterOptions::from_rows(&rows);
        assert_eq!(options.sectors, vec!["ENF", "UTI"]);
        assert_eq!(options.codes, vec!["F", "M", "T"]);
    }

    #[rstest]
    fn filtering_is_idempotent(rows: Vec<AssignmentRecord>) {
        let filters = CalendarFilters::from_query(Some("UTI"), None);
        let once = filters.apply(&rows);
        let twice = filters.apply(&once);
        assert_eq!(once, twice);
    }

    #[rstest]
    fn day_detail_groups_by_first_appearance(rows: Vec<AssignmentRecord>) {
        let detail = day_detail(1, &rows, &CalendarFilters::default());
        let sectors: Vec<&str> = detail.groups.iter().map(|g| g.sector.as_str()).collect();
        assert_eq!(sectors, vec!["UTI", "ENF"]);
        assert_eq!(detail.groups[0].people.len(), 2);
        assert!(detail.message.is_none());
    }

    #[rstest]
    fn empty_day_carries_message(rows: Vec<AssignmentRecord>) {
        let detail = day_detail(3, &rows, &CalendarFilters::default());
        assert!(detail.groups.is_empty());
        assert_eq!(detail.message.as_deref(), Some(NO_ONE_SCHEDULED));
    }
}
