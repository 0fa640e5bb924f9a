//! Domain primitives, projections and services.
//!
//! Purpose: define the roster vocabulary shared by the HTTP adapter, the
//! storage adapters and the import CLI, plus the pure projections (calendar,
//! employee month, coworkers) and the import reconciler.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error envelope.
//! - MonthYear, Schedule, Employee, AssignmentRecord: roster data.
//! - ParsedPayload: validated parser output.
//! - AccessService, RosterQueryService, RosterImportService: driving port
//!   implementations.

pub mod access_service;
pub mod auth;
pub mod calendar;
pub mod coworkers;
pub mod employee_schedule;
pub mod error;
pub mod parsed_payload;
pub mod ports;
pub mod reconciler;
pub mod roster;
pub mod roster_import_service;
pub mod roster_query_service;
pub mod trace_id;
pub mod user;

pub use self::access_service::AccessService;
pub use self::auth::{AccessContext, AccessLevel, LoginCredentials, LoginValidationError, Profile};
pub use self::calendar::{
    ALL, CalendarDay, CalendarFilters, CalendarMonth, DayDetail, DayPerson, FilterOptions,
    NO_ONE_SCHEDULED, SectorGroup, Selection, day_detail, project_month,
};
pub use self::coworkers::{Coworker, CoworkerList, CoworkerLookupKey, NO_COWORKERS};
pub use self::employee_schedule::{
    CodeCount, EMPLOYEE_NOT_FOUND, EmployeeLookup, EmployeeSchedule, EmployeeScheduleView,
    NO_EMPLOYEE_SELECTED, NO_ENTRIES, NO_NEXT_WORK_DAY, NO_RECORD, NO_SCHEDULE, NextWorkDay,
    TimelineAssignment, TimelineEntry, current_day, find_employee_by_search, next_work_day,
    summarize,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::parsed_payload::{
    DayCode, ParsedEmployee, ParsedPayload, ParsedSector, PayloadMetadata, PayloadValidationError,
    count_parsed_assignments,
};
pub use self::reconciler::{
    AssignmentDraft, EmployeeDraft, ImportOutcome, ImportPlan, ImportReport, ImportTarget,
    NewAssignment, ResolvedAssignments, assignment_drafts, dedupe_employees, resolve_assignments,
};
pub use self::roster::{
    AssignmentRecord, CodeLegendEntry, DayStatus, Employee, EmployeeId, Matricula, MonthYear,
    NON_WORK_CODES, RosterValidationError, Schedule, ScheduleId, is_non_work_code,
};
pub use self::roster_import_service::RosterImportService;
pub use self::roster_query_service::RosterQueryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use roster::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
