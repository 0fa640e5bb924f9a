//! Calendar endpoints.
//!
//! ```text
//! GET /api/v1/calendar?month=3&year=2024&sector=UTI&code=ALL
//! GET /api/v1/calendar/days/12?month=3&year=2024
//! ```
//!
//! Both are public. Unknown filter values fall back to `ALL`.

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::{CalendarFilters, CalendarMonth, DayDetail, MonthYear};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{CalendarMonthSchema, DayDetailSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::PeriodQuery;

/// Period and filter query parameters.
///
/// Fields are spelled out rather than flattening [`PeriodQuery`]; flattened
/// numbers do not survive URL-encoded deserialisation.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    /// Month 1-12; defaults to the current month.
    pub month: Option<u32>,
    /// Defaults to the current year.
    pub year: Option<i32>,
    /// Sector name or `ALL`.
    pub sector: Option<String>,
    /// Code or `ALL`.
    pub code: Option<String>,
}

impl CalendarQuery {
    fn split(&self, state: &HttpState) -> ApiResult<(MonthYear, CalendarFilters)> {
        let period = PeriodQuery {
            month: self.month,
            year: self.year,
        }
        .resolve(state.clock.as_ref())?;
        let filters = CalendarFilters::from_query(self.sector.as_deref(), self.code.as_deref());
        Ok((period, filters))
    }
}

/// Month grid with per-day counts.
#[utoipa::path(
    get,
    path = "/api/v1/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Calendar month", body = CalendarMonthSchema),
        (status = 400, description = "Invalid period", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["calendar"],
    operation_id = "getCalendar",
    security([])
)]
#[get("/calendar")]
pub async fn get_calendar(
    state: web::Data<HttpState>,
    query: web::Query<CalendarQuery>,
) -> ApiResult<web::Json<CalendarMonth>> {
    let (period, filters) = query.split(&state)?;
    let month = state.roster.calendar(period, filters).await?;
    Ok(web::Json(month))
}

/// People on one day, grouped by sector.
#[utoipa::path(
    get,
    path = "/api/v1/calendar/days/{day}",
    params(("day" = u32, Path, description = "Day of month"), CalendarQuery),
    responses(
        (status = 200, description = "Day detail", body = DayDetailSchema),
        (status = 400, description = "Invalid day or period", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["calendar"],
    operation_id = "getCalendarDay",
    security([])
)]
#[get("/calendar/days/{day}")]
pub async fn get_calendar_day(
    state: web::Data<HttpState>,
    path: web::Path<u32>,
    query: web::Query<CalendarQuery>,
) -> ApiResult<web::Json<DayDetail>> {
    let (period, filters) = query.split(&state)?;
    let detail = state
        .roster
        .day_detail(period, path.into_inner(), filters)
        .await?;
    Ok(web::Json(detail))
}
