//! Typed view of the parser's JSON output.
//!
//! The parser service returns loosely typed JSON: numbers arrive as strings,
//! matriculas as numbers, optional fields as empty strings. [`ParsedPayload::
//! from_value`] validates all of it once so the reconciler and the preview
//! flow work with checked values.

use serde_json::{Map, Value};

use super::{CodeLegendEntry, Matricula, MonthYear, RosterValidationError};

/// Reasons a parser payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadValidationError {
    /// The top-level document was not a JSON object.
    #[error("payload must be a JSON object")]
    NotAnObject,
    /// A required field was absent or null.
    #[error("{path} is required")]
    Missing {
        /// Location of the field.
        path: String,
    },
    /// A field had the wrong shape.
    #[error("{path} {reason}")]
    Invalid {
        /// Location of the field.
        path: String,
        /// Human-readable cause.
        reason: String,
    },
    /// Month or year failed range checks.
    #[error("metadata: {0}")]
    Period(#[from] RosterValidationError),
}

impl PayloadValidationError {
    fn missing(path: impl Into<String>) -> Self {
        Self::Missing { path: path.into() }
    }

    fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Header fields describing the imported month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadMetadata {
    /// Month and year covered.
    pub period: MonthYear,
    /// Month label printed on the document.
    pub month_name: Option<String>,
    /// Uploaded file name.
    pub source_filename: Option<String>,
}

/// One `day -> code` entry of an employee row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCode {
    /// Day of month within the payload period.
    pub day: u32,
    /// Trimmed, non-empty code.
    pub code: String,
}

/// Employee row inside a sector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEmployee {
    /// Business identifier.
    pub matricula: Matricula,
    /// Display name, trimmed.
    pub name: String,
    /// Job role.
    pub role: Option<String>,
    /// Shift hours.
    pub shift_hours: Option<String>,
    /// Day entries ordered by ascending day.
    pub days: Vec<DayCode>,
}

/// Sector block of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSector {
    /// Sector name.
    pub name: String,
    /// Employees listed under the sector.
    pub employees: Vec<ParsedEmployee>,
}

/// Validated parser payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPayload {
    /// Month header.
    pub metadata: PayloadMetadata,
    /// Sector blocks in document order.
    pub sectors: Vec<ParsedSector>,
    /// Legend entries.
    pub legend: Vec<CodeLegendEntry>,
}

impl ParsedPayload {
    /// Validate a raw parser document.
    ///
    /// # Examples
    /// ```
    /// use roster::domain::ParsedPayload;
    /// use serde_json::json;
    ///
    /// let payload = ParsedPayload::from_value(&json!({
    ///     "metadata": { "month": "3", "year": 2024 },
    ///     "sectors": [{ "name": "UTI", "employees": [
    ///         { "matricula": 123, "name": "Ana", "days": { "2": "F", "1": "M" } }
    ///     ]}]
    /// }))
    /// .unwrap();
    /// assert_eq!(payload.count_assignments(), 2);
    /// assert_eq!(payload.sectors[0].employees[0].days[0].day, 1);
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, PayloadValidationError> {
        let root = value.as_object().ok_or(PayloadValidationError::NotAnObject)?;
        let metadata = parse_metadata(root.get("metadata"))?;
        let sectors = match root.get("sectors") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| parse_sector(&metadata.period, index, item))
                .collect::<Result<Vec<_>, _>>()?,
            None | Some(Value::Null) => return Err(PayloadValidationError::missing("sectors")),
            Some(_) => {
                return Err(PayloadValidationError::invalid("sectors", "must be an array"));
            }
        };
        let legend = match root.get("legend") {
            Some(Value::Object(entries)) => parse_legend(entries),
            _ => Vec::new(),
        };
        Ok(Self {
            metadata,
            sectors,
            legend,
        })
    }

    /// Total number of day entries across every sector and employee.
    pub fn count_assignments(&self) -> usize {
        self.sectors
            .iter()
            .flat_map(|sector| sector.employees.iter())
            .map(|employee| employee.days.len())
            .sum()
    }
}

/// Count day entries of a raw payload without validating it.
///
/// Malformed branches contribute zero, matching the preview counter.
pub fn count_parsed_assignments(value: &Value) -> usize {
    value
        .get("sectors")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|sector| sector.get("employees").and_then(Value::as_array))
        .flatten()
        .filter_map(|employee| employee.get("days").and_then(Value::as_object))
        .map(Map::len)
        .sum()
}

fn parse_metadata(value: Option<&Value>) -> Result<PayloadMetadata, PayloadValidationError> {
    let meta = match value {
        Some(Value::Object(meta)) => meta,
        None | Some(Value::Null) => return Err(PayloadValidationError::missing("metadata")),
        Some(_) => {
            return Err(PayloadValidationError::invalid("metadata", "must be an object"));
        }
    };
    let month = required_number(meta, "metadata.month", "month")?;
    let year = required_number(meta, "metadata.year", "year")?;
    let month = u32::try_from(month)
        .map_err(|_| PayloadValidationError::invalid("metadata.month", "is out of range"))?;
    let year = i32::try_from(year)
        .map_err(|_| PayloadValidationError::invalid("metadata.year", "is out of range"))?;
    Ok(PayloadMetadata {
        period: MonthYear::new(month, year)?,
        month_name: optional_text(meta.get("month_name")),
        source_filename: optional_text(meta.get("source_filename")),
    })
}

fn required_number(
    meta: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<i64, PayloadValidationError> {
    let number = match meta.get(key) {
        None | Some(Value::Null) => return Err(PayloadValidationError::missing(path)),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    match number {
        Some(0) => Err(PayloadValidationError::missing(path)),
        Some(n) => Ok(n),
        None => Err(PayloadValidationError::invalid(path, "must be an integer")),
    }
}

fn parse_sector(
    period: &MonthYear,
    index: usize,
    value: &Value,
) -> Result<ParsedSector, PayloadValidationError> {
    let path = format!("sectors[{index}]");
    let sector = value
        .as_object()
        .ok_or_else(|| PayloadValidationError::invalid(&path, "must be an object"))?;
    let name = sector
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| PayloadValidationError::missing(format!("{path}.name")))?
        .to_owned();
    let employees = match sector.get("employees") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| parse_employee(period, &format!("{path}.employees[{idx}]"), item))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(PayloadValidationError::invalid(
                format!("{path}.employees"),
                "must be an array",
            ));
        }
    };
    Ok(ParsedSector { name, employees })
}

fn parse_employee(
    period: &MonthYear,
    path: &str,
    value: &Value,
) -> Result<ParsedEmployee, PayloadValidationError> {
    let employee = value
        .as_object()
        .ok_or_else(|| PayloadValidationError::invalid(path, "must be an object"))?;
    let matricula = scalar_text(employee.get("matricula"))
        .ok_or_else(|| PayloadValidationError::missing(format!("{path}.matricula")))
        .and_then(|raw| {
            Matricula::new(raw).map_err(|err| {
                PayloadValidationError::invalid(format!("{path}.matricula"), err.to_string())
            })
        })?;
    let name = employee
        .get("name")
        .and_then(Value::as_str)
        .map(|name| name.trim().to_owned())
        .unwrap_or_default();
    let days = match employee.get("days") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(days)) => parse_days(period, &format!("{path}.days"), days)?,
        Some(_) => {
            return Err(PayloadValidationError::invalid(
                format!("{path}.days"),
                "must be an object",
            ));
        }
    };
    Ok(ParsedEmployee {
        matricula,
        name,
        role: optional_text(employee.get("role")),
        shift_hours: optional_text(employee.get("shift_hours")),
        days,
    })
}

fn parse_days(
    period: &MonthYear,
    path: &str,
    days: &Map<String, Value>,
) -> Result<Vec<DayCode>, PayloadValidationError> {
    let mut parsed = days
        .iter()
        .map(|(key, code)| -> Result<DayCode, PayloadValidationError> {
            let entry_path = format!("{path}[\"{key}\"]");
            let day = key
                .trim()
                .parse::<u32>()
                .map_err(|_| PayloadValidationError::invalid(&entry_path, "is not a day number"))
                .and_then(|day| {
                    period.validate_day(day).map_err(|err| {
                        PayloadValidationError::invalid(&entry_path, err.to_string())
                    })
                })?;
            let code = scalar_text(Some(code))
                .filter(|code| !code.is_empty())
                .ok_or_else(|| PayloadValidationError::invalid(&entry_path, "has an empty code"))?;
            Ok(DayCode { day, code })
        })
        .collect::<Result<Vec<_>, _>>()?;
    parsed.sort_by_key(|entry| entry.day);
    Ok(parsed)
}

fn parse_legend(entries: &Map<String, Value>) -> Vec<CodeLegendEntry> {
    let mut legend: Vec<CodeLegendEntry> = Vec::new();
    for (code, description) in entries {
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        let description = match description {
            Value::String(text) => text.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        // Keys that only differ by whitespace collapse; the later one wins.
        match legend.iter_mut().find(|entry| entry.code == code) {
            Some(entry) => entry.description = description,
            None => legend.push(CodeLegendEntry {
                code: code.to_owned(),
                description,
            }),
        }
    }
    legend
}

/// Strings and numbers rendered as trimmed text.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.trim().to_owned()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    scalar_text(value).filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn march_payload() -> Value {
        json!({
            "metadata": {
                "month": 3,
                "year": 2024,
                "month_name": "MARÇO",
                "source_filename": "marco.pdf"
            },
            "sectors": [
                {
                    "name": "UTI",
                    "employees": [
                        {
                            "matricula": " 123 ",
                            "name": " Ana ",
                            "role": "Fisioterapeuta",
                            "shift_hours": "",
                            "days": { "10": "M", "2": "F", "1": " M " }
                        }
                    ]
                },
                { "name": "ENF" }
            ],
            "legend": { "M": "Manhã", "F": "Folga", "X": 7 }
        })
    }

    #[rstest]
    fn parses_and_normalises_fields(march_payload: Value) {
        let payload = ParsedPayload::from_value(&march_payload).expect("valid payload");
        assert_eq!(payload.metadata.period, MonthYear::new(3, 2024).expect("period"));
        assert_eq!(payload.metadata.month_name.as_deref(), Some("MARÇO"));
        let ana = &payload.sectors[0].employees[0];
        assert_eq!(ana.matricula.as_ref(), "123");
        assert_eq!(ana.name, "Ana");
        assert_eq!(ana.shift_hours, None);
        let days: Vec<(u32, &str)> = ana.days.iter().map(|d| (d.day, d.code.as_str())).collect();
        assert_eq!(days, vec![(1, "M"), (2, "F"), (10, "M")]);
        assert!(payload.sectors[1].employees.is_empty());
        assert_eq!(payload.legend.len(), 3);
        assert_eq!(payload.legend[2].description, "7");
    }

    #[rstest]
    fn counts_match_raw_and_typed_views(march_payload: Value) {
        let payload = ParsedPayload::from_value(&march_payload).expect("valid payload");
        assert_eq!(payload.count_assignments(), 3);
        assert_eq!(count_parsed_assignments(&march_payload), 3);
    }

    #[rstest]
    fn numeric_strings_and_numbers_are_accepted() {
        let value = json!({
            "metadata": { "month": "2", "year": "2024" },
            "sectors": [{ "name": "UTI", "employees": [
                { "matricula": 7, "name": "Bia", "days": { "29": 5 } }
            ]}]
        });
        let payload = ParsedPayload::from_value(&value).expect("valid payload");
        let bia = &payload.sectors[0].employees[0];
        assert_eq!(bia.matricula.as_ref(), "7");
        assert_eq!(bia.days[0].code, "5");
    }

    #[rstest]
    #[case(json!([]), "payload must be a JSON object")]
    #[case(json!({ "sectors": [] }), "metadata is required")]
    #[case(json!({ "metadata": { "month": 0, "year": 2024 }, "sectors": [] }), "metadata.month is required")]
    #[case(json!({ "metadata": { "month": 3 }, "sectors": [] }), "metadata.year is required")]
    #[case(json!({ "metadata": { "month": "x", "year": 2024 }, "sectors": [] }), "metadata.month must be an integer")]
    #[case(json!({ "metadata": { "month": 13, "year": 2024 }, "sectors": [] }), "metadata: month must be between 1 and 12, got 13")]
    #[case(json!({ "metadata": { "month": 3, "year": 2024 }, "sectors": {} }), "sectors must be an array")]
    #[case(json!({ "metadata": { "month": 3, "year": 2024 } }), "sectors is required")]
    fn rejects_malformed_headers(#[case] value: Value, #[case] message: &str) {
        let err = ParsedPayload::from_value(&value).expect_err("must fail");
        assert_eq!(err.to_string(), message);
    }

    #[rstest]
    #[case(json!({ "31": "M" }), "sectors[0].employees[0].days[\"31\"] day must be between 1 and 30, got 31")]
    #[case(json!({ "abc": "M" }), "sectors[0].employees[0].days[\"abc\"] is not a day number")]
    #[case(json!({ "1": "  " }), "sectors[0].employees[0].days[\"1\"] has an empty code")]
    #[case(json!({ "1": null }), "sectors[0].employees[0].days[\"1\"] has an empty code")]
    fn rejects_bad_day_entries(#[case] days: Value, #[case] message: &str) {
        let value = json!({
            "metadata": { "month": 4, "year": 2024 },
            "sectors": [{ "name": "UTI", "employees": [
                { "matricula": "1", "name": "Ana", "days": days }
            ]}]
        });
        let err = ParsedPayload::from_value(&value).expect_err("must fail");
        assert_eq!(err.to_string(), message);
    }

    #[rstest]
    fn rejects_blank_matricula() {
        let value = json!({
            "metadata": { "month": 4, "year": 2024 },
            "sectors": [{ "name": "UTI", "employees": [{ "matricula": " ", "name": "Ana" }]}]
        });
        assert!(matches!(
            ParsedPayload::from_value(&value),
            Err(PayloadValidationError::Invalid { .. })
        ));
    }

    #[rstest]
    fn non_object_legend_is_ignored() {
        let value = json!({
            "metadata": { "month": 4, "year": 2024 },
            "sectors": [],
            "legend": ["M", "F"]
        });
        let payload = ParsedPayload::from_value(&value).expect("valid payload");
        assert!(payload.legend.is_empty());
    }

    #[rstest]
    fn legend_codes_collapse_after_trimming() {
        let value = json!({
            "metadata": { "month": 4, "year": 2024 },
            "sectors": [],
            "legend": { " M": "Old", "M": "Morning" }
        });
        let payload = ParsedPayload::from_value(&value).expect("valid payload");
        assert_eq!(payload.legend.len(), 1);
        assert_eq!(payload.legend[0].code, "M");
        assert_eq!(payload.legend[0].description, "Morning");
    }

    #[rstest]
    fn raw_count_tolerates_malformed_branches() {
        let value = json!({ "sectors": [{ "employees": [{ "days": [] }, { "days": { "1": "M" } }] }, 3] });
        assert_eq!(count_parsed_assignments(&value), 1);
    }
}
