//! OpenAPI document for the roster API.
//!
//! Served by Swagger UI in debug builds and written out by the
//! `openapi-dump` binary.

use crate::inbound::http::auth::{LoginRequest, SessionResponse};
use crate::inbound::http::employees::EmployeeSearchResponse;
use crate::inbound::http::health::{Backing, ReadinessReport};
use crate::inbound::http::imports::{SaveRosterBody, SaveRosterResponse};
use crate::inbound::http::schemas::{
    CalendarDaySchema, CalendarMonthSchema, CodeLegendEntrySchema, CoworkerListSchema,
    DayDetailSchema, EmployeeScheduleViewSchema, EmployeeSchema, ErrorCodeSchema, ErrorSchema,
    ImportReportSchema, MonthYearSchema, ParsePreviewSchema, ScheduleSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Roster API",
        description = "Monthly shift rosters: calendar, employee and coworker views plus the admin import flow."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::calendar::get_calendar,
        crate::inbound::http::calendar::get_calendar_day,
        crate::inbound::http::employees::list_employees,
        crate::inbound::http::employees::search_employee,
        crate::inbound::http::employees::employee_schedule,
        crate::inbound::http::employees::list_coworkers,
        crate::inbound::http::employees::get_legend,
        crate::inbound::http::imports::parse_roster,
        crate::inbound::http::imports::save_roster,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MonthYearSchema,
        ScheduleSchema,
        EmployeeSchema,
        CodeLegendEntrySchema,
        CalendarDaySchema,
        CalendarMonthSchema,
        DayDetailSchema,
        EmployeeScheduleViewSchema,
        CoworkerListSchema,
        ParsePreviewSchema,
        ImportReportSchema,
        LoginRequest,
        SessionResponse,
        EmployeeSearchResponse,
        SaveRosterBody,
        SaveRosterResponse,
        ReadinessReport,
        Backing,
    )),
    tags(
        (name = "session", description = "Login, logout and access level"),
        (name = "calendar", description = "Month grid and day detail"),
        (name = "employees", description = "Directory, employee schedule, coworkers and legend"),
        (name = "imports", description = "Admin-only parse and save"),
        (name = "health", description = "Readiness and liveness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn doc() -> utoipa::openapi::OpenApi {
        ApiDoc::openapi()
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/calendar")]
    #[case("/api/v1/calendar/days/{day}")]
    #[case("/api/v1/employees/{id}/schedule")]
    #[case("/api/v1/schedules/{id}/coworkers")]
    #[case("/api/v1/imports/parse")]
    #[case("/api/v1/imports")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        assert!(doc().paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn error_schema_exposes_envelope_fields() {
        let doc = doc();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let RefOr::T(Schema::Object(error)) = schemas.get("crate.domain.Error").expect("Error")
        else {
            panic!("expected object schema");
        };
        for field in ["code", "message", "traceId", "details"] {
            assert!(error.properties.contains_key(field), "missing {field}");
        }
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = doc();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
