//! Shared request validation for the roster endpoints.

use mockable::Clock;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, MonthYear};

/// Machine-readable codes placed in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidPeriod,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidPeriod => "invalid_period",
        }
    }
}

/// Request field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

fn field_error(field: FieldName, message: String, code: ValidationCode, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.0, "value": value, "code": code.as_str() }),
        None => json!({ "field": field.0, "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        format!("missing required field: {}", field.0),
        ValidationCode::MissingField,
        None,
    )
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        field_error(
            field,
            format!("{} must be a valid UUID", field.0),
            ValidationCode::InvalidUuid,
            Some(value),
        )
    })
}

/// `month` and `year` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    /// Month 1-12; defaults to the current month.
    pub month: Option<u32>,
    /// Four-digit year; defaults to the current year.
    pub year: Option<i32>,
}

impl PeriodQuery {
    /// Requested period, filling gaps from `clock`'s local date.
    pub(crate) fn resolve(self, clock: &dyn Clock) -> Result<MonthYear, Error> {
        let today = MonthYear::of_date(clock.local().date_naive());
        let month = self.month.unwrap_or(today.month());
        let year = self.year.unwrap_or(today.year());
        MonthYear::new(month, year).map_err(|err| {
            field_error(
                FieldName::new("month"),
                err.to_string(),
                ValidationCode::InvalidPeriod,
                Some(&format!("{month}/{year}")),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::FixtureClock;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, (3, 2024))]
    #[case(Some(7), None, (7, 2024))]
    #[case(Some(12), Some(2023), (12, 2023))]
    fn missing_parts_default_to_today(
        #[case] month: Option<u32>,
        #[case] year: Option<i32>,
        #[case] expected: (u32, i32),
    ) {
        let clock = FixtureClock::at(2024, 3, 15);
        let period = PeriodQuery { month, year }
            .resolve(&clock)
            .expect("valid period");
        assert_eq!((period.month(), period.year()), expected);
    }

    #[rstest]
    fn out_of_range_month_is_invalid_request() {
        let clock = FixtureClock::at(2024, 3, 15);
        let err = PeriodQuery {
            month: Some(13),
            year: Some(2024),
        }
        .resolve(&clock)
        .expect_err("month 13");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let code = err
            .details()
            .and_then(|details| details.get("code"))
            .and_then(serde_json::Value::as_str);
        assert_eq!(code, Some("invalid_period"));
    }

    #[rstest]
    fn bad_uuid_reports_value() {
        let err = parse_uuid("abc", FieldName::new("employeeId")).expect_err("bad uuid");
        let details = err.details().expect("details");
        assert_eq!(details.get("value").and_then(|v| v.as_str()), Some("abc"));
        assert_eq!(details.get("field").and_then(|v| v.as_str()), Some("employeeId"));
    }
}
