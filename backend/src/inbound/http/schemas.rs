//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their JSON shape for the generated document.

#![expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]

use utoipa::ToSchema;

/// Stable machine-readable error codes.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// A schedule already exists for the period; details carry
    /// `code: "schedule_exists"`.
    #[schema(rename = "conflict")]
    Conflict,
    /// Parser or storage not configured or unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// Storage rejected a statement; the message carries the database text.
    #[schema(rename = "storage_error")]
    StorageError,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// API error payload.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "metadata.month is required")]
    message: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// Month and year.
#[derive(ToSchema)]
#[schema(as = crate::domain::MonthYear)]
pub struct MonthYearSchema {
    #[schema(example = 3, minimum = 1, maximum = 12)]
    month: u32,
    #[schema(example = 2024)]
    year: i32,
}

/// Stored schedule for one month.
#[derive(ToSchema)]
#[schema(as = crate::domain::Schedule)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    month: u32,
    year: i32,
    #[schema(example = "MARÇO")]
    month_name: Option<String>,
    #[schema(example = "escala-marco.pdf")]
    source_filename: Option<String>,
}

/// Employee directory entry.
#[derive(ToSchema)]
#[schema(as = crate::domain::Employee)]
pub struct EmployeeSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "123456")]
    matricula: String,
    #[schema(example = "Ana Souza")]
    name: String,
}

/// Code legend entry.
#[derive(ToSchema)]
#[schema(as = crate::domain::CodeLegendEntry)]
pub struct CodeLegendEntrySchema {
    #[schema(example = "M")]
    code: String,
    #[schema(example = "Morning shift")]
    description: String,
}

/// Calendar cell.
#[derive(ToSchema)]
#[schema(as = crate::domain::CalendarDay)]
pub struct CalendarDaySchema {
    day: u32,
    count: usize,
}

/// Calendar grid for one month.
#[derive(ToSchema)]
#[schema(as = crate::domain::CalendarMonth)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonthSchema {
    period: MonthYearSchema,
    schedule: Option<ScheduleSchema>,
    days_in_month: u32,
    /// Blank cells before day 1 in a Sunday-first grid.
    leading_blanks: u32,
    /// Applied filters: `{ "sector": "ALL", "code": "M" }`.
    #[schema(value_type = Object)]
    filters: serde_json::Value,
    /// Sorted distinct `sectors` and `codes` of the month.
    #[schema(value_type = Object)]
    options: serde_json::Value,
    days: Vec<CalendarDaySchema>,
}

/// Sector-grouped people on one day.
#[derive(ToSchema)]
#[schema(as = crate::domain::DayDetail)]
pub struct DayDetailSchema {
    day: u32,
    /// `[{ "sector", "people": [{ employeeId, name, matricula, code, role, shiftHours }] }]`.
    #[schema(value_type = Vec<Object>)]
    groups: Vec<serde_json::Value>,
    #[schema(example = "No one scheduled with the current filters.")]
    message: Option<String>,
}

/// One employee's month, tagged by `outcome`.
#[derive(ToSchema)]
#[schema(as = crate::domain::EmployeeScheduleView)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeScheduleViewSchema {
    /// `no_schedule`, `no_entries` or `summary`.
    #[schema(example = "summary")]
    outcome: String,
    /// Present on `no_schedule` and `no_entries`.
    period: Option<MonthYearSchema>,
    /// Present on `no_schedule` and `no_entries`.
    message: Option<String>,
    schedule: Option<ScheduleSchema>,
    employee: Option<EmployeeSchema>,
    #[schema(value_type = Option<Vec<Object>>)]
    count_by_code: Option<Vec<serde_json::Value>>,
    work_days: Option<usize>,
    off_days: Option<usize>,
    #[schema(value_type = Option<Object>)]
    next_work_day: Option<serde_json::Value>,
    next_work_day_message: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    timeline: Option<Vec<serde_json::Value>>,
}

/// Coworkers for one work assignment.
#[derive(ToSchema)]
#[schema(as = crate::domain::CoworkerList)]
pub struct CoworkerListSchema {
    /// `{ scheduleId, sector, day, employeeId }`.
    #[schema(value_type = Object)]
    key: serde_json::Value,
    /// `[{ employeeId, name, matricula, code }]`.
    #[schema(value_type = Vec<Object>)]
    coworkers: Vec<serde_json::Value>,
    #[schema(example = "No coworkers found for this day and sector.")]
    message: Option<String>,
}

/// Parser output awaiting confirmation.
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::ParsePreview)]
#[serde(rename_all = "camelCase")]
pub struct ParsePreviewSchema {
    /// Raw parser JSON; send it back unchanged to save.
    #[schema(value_type = Object)]
    preview: serde_json::Value,
    assignment_count: usize,
    period: MonthYearSchema,
}

/// Result of a committed import.
#[derive(ToSchema)]
#[schema(as = crate::domain::ImportReport)]
#[serde(rename_all = "camelCase")]
pub struct ImportReportSchema {
    #[schema(value_type = String, format = Uuid)]
    schedule_id: String,
    period: MonthYearSchema,
    /// `created` or `overwritten`.
    #[schema(example = "created")]
    outcome: String,
    assignments_written: usize,
    employees_upserted: usize,
    legend_entries: usize,
    unresolved_matriculas: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let json = schema_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "storage_error",
            "internal_error",
        ] {
            assert!(json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn schemas_are_named_after_domain_types() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert_eq!(CalendarMonthSchema::name(), "crate.domain.CalendarMonth");
        assert_eq!(ImportReportSchema::name(), "crate.domain.ImportReport");
    }

    #[test]
    fn camel_case_fields_match_wire_format() {
        let json = schema_json::<CalendarMonthSchema>();
        assert!(json.contains("daysInMonth"));
        assert!(json.contains("leadingBlanks"));
        let json = schema_json::<ErrorSchema>();
        assert!(json.contains("traceId"));
    }
}
