//! Employee directory, per-employee schedule, coworkers and code legend.
//!
//! ```text
//! GET /api/v1/employees
//! GET /api/v1/employees/search?q=123%20-%20Ana
//! GET /api/v1/employees/{id}/schedule?month=3&year=2024
//! GET /api/v1/schedules/{id}/coworkers?sector=UTI&day=4&employeeId=...
//! GET /api/v1/legend
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    CodeLegendEntry, CoworkerList, CoworkerLookupKey, Employee, EmployeeId, EmployeeLookup,
    EmployeeScheduleView, ScheduleId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    CodeLegendEntrySchema, CoworkerListSchema, EmployeeScheduleViewSchema, EmployeeSchema,
    ErrorSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PeriodQuery, missing_field_error, parse_uuid};

/// List every employee, sorted by name.
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "Employee directory", body = [EmployeeSchema]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "listEmployees",
    security([])
)]
#[get("/employees")]
pub async fn list_employees(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Employee>>> {
    Ok(web::Json(state.roster.employees().await?))
}

/// Picker text.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// `"<matricula> - <name>"`, a bare matricula or a full label.
    pub q: Option<String>,
}

/// Search result; `employee` is null on a miss and `message` says why.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EmployeeSearchResponse {
    #[schema(value_type = Option<EmployeeSchema>)]
    pub employee: Option<Employee>,
    #[schema(example = "Select an employee.")]
    pub message: Option<String>,
}

impl From<EmployeeLookup> for EmployeeSearchResponse {
    fn from(lookup: EmployeeLookup) -> Self {
        let message = lookup.message().map(str::to_owned);
        let employee = match lookup {
            EmployeeLookup::Found(employee) => Some(employee),
            EmployeeLookup::NotSelected | EmployeeLookup::NotFound => None,
        };
        Self { employee, message }
    }
}

/// Resolve picker text to an employee.
#[utoipa::path(
    get,
    path = "/api/v1/employees/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Lookup result", body = EmployeeSearchResponse),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "searchEmployee",
    security([])
)]
#[get("/employees/search")]
pub async fn search_employee(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<EmployeeSearchResponse>> {
    let text = query.into_inner().q.unwrap_or_default();
    let lookup = state.roster.search_employee(text).await?;
    Ok(web::Json(lookup.into()))
}

/// One employee's month.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}/schedule",
    params(("id" = String, Path, description = "Employee id"), PeriodQuery),
    responses(
        (status = 200, description = "Employee schedule", body = EmployeeScheduleViewSchema),
        (status = 400, description = "Invalid id or period", body = ErrorSchema),
        (status = 404, description = "Unknown employee", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "getEmployeeSchedule",
    security([])
)]
#[get("/employees/{id}/schedule")]
pub async fn employee_schedule(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<PeriodQuery>,
) -> ApiResult<web::Json<EmployeeScheduleView>> {
    let employee_id = EmployeeId::from_uuid(parse_uuid(&path, FieldName::new("id"))?);
    let period = query.into_inner().resolve(state.clock.as_ref())?;
    let view = state.roster.employee_schedule(employee_id, period).await?;
    Ok(web::Json(view))
}

/// Coworker lookup parameters.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CoworkerQuery {
    pub sector: Option<String>,
    pub day: Option<u32>,
    /// Employee to leave out.
    pub employee_id: Option<String>,
}

impl CoworkerQuery {
    fn into_key(self, schedule_id: ScheduleId) -> ApiResult<CoworkerLookupKey> {
        let sector = self
            .sector
            .filter(|sector| !sector.trim().is_empty())
            .ok_or_else(|| missing_field_error(FieldName::new("sector")))?;
        let day = self
            .day
            .ok_or_else(|| missing_field_error(FieldName::new("day")))?;
        let raw_employee = self
            .employee_id
            .ok_or_else(|| missing_field_error(FieldName::new("employeeId")))?;
        let employee_id =
            EmployeeId::from_uuid(parse_uuid(&raw_employee, FieldName::new("employeeId"))?);
        Ok(CoworkerLookupKey {
            schedule_id,
            sector,
            day,
            employee_id,
        })
    }
}

/// Others on the same schedule, sector and day.
#[utoipa::path(
    get,
    path = "/api/v1/schedules/{id}/coworkers",
    params(("id" = String, Path, description = "Schedule id"), CoworkerQuery),
    responses(
        (status = 200, description = "Coworkers", body = CoworkerListSchema),
        (status = 400, description = "Missing or invalid parameter", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "listCoworkers",
    security([])
)]
#[get("/schedules/{id}/coworkers")]
pub async fn list_coworkers(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<CoworkerQuery>,
) -> ApiResult<web::Json<CoworkerList>> {
    let schedule_id = ScheduleId::from_uuid(parse_uuid(&path, FieldName::new("id"))?);
    let key = query.into_inner().into_key(schedule_id)?;
    Ok(web::Json(state.roster.coworkers(key).await?))
}

/// Code dictionary.
#[utoipa::path(
    get,
    path = "/api/v1/legend",
    responses(
        (status = 200, description = "Legend sorted by code", body = [CodeLegendEntrySchema]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "getLegend",
    security([])
)]
#[get("/legend")]
pub async fn get_legend(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CodeLegendEntry>>> {
    Ok(web::Json(state.roster.legend().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        EMPLOYEE_NOT_FOUND, Matricula, MonthYear, NO_COWORKERS, NO_EMPLOYEE_SELECTED, NO_SCHEDULE,
    };
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;
    use uuid::Uuid;

    macro_rules! employees_app {
        ($ports:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($ports.into_state()))
                    .service(
                        web::scope("/api/v1")
                            .service(list_employees)
                            .service(search_employee)
                            .service(employee_schedule)
                            .service(list_coworkers)
                            .service(get_legend),
                    ),
            )
            .await
        };
    }

    fn ana() -> Employee {
        Employee {
            id: EmployeeId::random(),
            matricula: Matricula::new("123").expect("matricula"),
            name: "Ana".to_owned(),
        }
    }

    async fn get_json(uri: &str, ports: MockPorts) -> (StatusCode, Value) {
        let app = employees_app!(ports);
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[actix_web::test]
    async fn directory_is_returned_as_is() {
        let mut ports = MockPorts::default();
        ports
            .roster
            .expect_employees()
            .times(1)
            .returning(|| Ok(vec![ana()]));
        let (status, body) = get_json("/api/v1/employees", ports).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["matricula"], "123");
        assert_eq!(body[0]["name"], "Ana");
    }

    #[rstest]
    #[case(EmployeeLookup::NotSelected, NO_EMPLOYEE_SELECTED)]
    #[case(EmployeeLookup::NotFound, EMPLOYEE_NOT_FOUND)]
    #[actix_web::test]
    async fn search_misses_carry_message(#[case] lookup: EmployeeLookup, #[case] message: &str) {
        let mut ports = MockPorts::default();
        ports
            .roster
            .expect_search_employee()
            .return_once(move |_| Ok(lookup));
        let (status, body) = get_json("/api/v1/employees/search?q=zzz", ports).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["employee"].is_null());
        assert_eq!(body["message"], message);
    }

    #[actix_web::test]
    async fn search_forwards_picker_text() {
        let mut ports = MockPorts::default();
        let found = ana();
        ports
            .roster
            .expect_search_employee()
            .withf(|text| text == "123 - Ana")
            .return_once(move |_| Ok(EmployeeLookup::Found(found)));
        let (_, body) = get_json("/api/v1/employees/search?q=123%20-%20Ana", ports).await;
        assert_eq!(body["employee"]["name"], "Ana");
        assert!(body["message"].is_null());
    }

    #[actix_web::test]
    async fn schedule_without_roster_reports_outcome() {
        let mut ports = MockPorts::default();
        ports
            .roster
            .expect_employee_schedule()
            .withf(|_, period| *period == MonthYear::new(4, 2024).expect("period"))
            .return_once(|_, period| Ok(EmployeeScheduleView::no_schedule(period)));
        let uri = format!("/api/v1/employees/{}/schedule?month=4", Uuid::new_v4());
        let (status, body) = get_json(&uri, ports).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "no_schedule");
        assert_eq!(body["message"], NO_SCHEDULE);
    }

    #[actix_web::test]
    async fn malformed_employee_id_is_rejected() {
        let mut ports = MockPorts::default();
        ports.roster.expect_employee_schedule().never();
        let (status, body) = get_json("/api/v1/employees/not-a-uuid/schedule", ports).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "id");
        assert_eq!(body["details"]["code"], "invalid_uuid");
    }

    #[rstest]
    #[case("day=1&employeeId=3fa85f64-5717-4562-b3fc-2c963f66afa6", "sector")]
    #[case("sector=UTI&employeeId=3fa85f64-5717-4562-b3fc-2c963f66afa6", "day")]
    #[case("sector=UTI&day=1", "employeeId")]
    #[case("sector=%20&day=1&employeeId=3fa85f64-5717-4562-b3fc-2c963f66afa6", "sector")]
    #[actix_web::test]
    async fn coworker_lookup_requires_every_parameter(#[case] query: &str, #[case] field: &str) {
        let mut ports = MockPorts::default();
        ports.roster.expect_coworkers().never();
        let uri = format!("/api/v1/schedules/{}/coworkers?{query}", Uuid::new_v4());
        let (status, body) = get_json(&uri, ports).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn lone_worker_gets_empty_list() {
        let schedule = Uuid::new_v4();
        let employee = Uuid::new_v4();
        let mut ports = MockPorts::default();
        ports
            .roster
            .expect_coworkers()
            .withf(move |key| {
                key.schedule_id == ScheduleId::from_uuid(schedule)
                    && key.employee_id == EmployeeId::from_uuid(employee)
                    && key.sector == "UTI"
                    && key.day == 4
            })
            .return_once(|key| Ok(CoworkerList::from_rows(key, &[])));
        let uri =
            format!("/api/v1/schedules/{schedule}/coworkers?sector=UTI&day=4&employeeId={employee}");
        let (status, body) = get_json(&uri, ports).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["coworkers"], Value::Array(Vec::new()));
        assert_eq!(body["message"], NO_COWORKERS);
        assert_eq!(body["key"]["employeeId"], employee.to_string());
    }

    #[actix_web::test]
    async fn legend_lists_entries() {
        let mut ports = MockPorts::default();
        ports.roster.expect_legend().return_once(|| {
            Ok(vec![CodeLegendEntry {
                code: "M".to_owned(),
                description: "Morning".to_owned(),
            }])
        });
        let (_, body) = get_json("/api/v1/legend", ports).await;
        assert_eq!(body[0]["code"], "M");
        assert_eq!(body[0]["description"], "Morning");
    }
}
