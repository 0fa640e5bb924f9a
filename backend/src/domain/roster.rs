//! Core roster vocabulary: periods, identifiers, schedules and assignment rows.
//!
//! These types are shared by the projections, the reconciler and the storage
//! ports. They carry no persistence concerns; adapters translate their own row
//! structs into these values.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Codes that mark a day off rather than a worked shift.
pub const NON_WORK_CODES: [&str; 6] = ["F", "***", "L", "FE", "LC", "SE"];

/// Whether `code` denotes a day off.
///
/// # Examples
/// ```
/// use roster::domain::is_non_work_code;
///
/// assert!(is_non_work_code("F"));
/// assert!(!is_non_work_code("M"));
/// ```
pub fn is_non_work_code(code: &str) -> bool {
    NON_WORK_CODES.contains(&code)
}

/// Work/off classification of one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// The code is a worked shift.
    Work,
    /// The code is in [`NON_WORK_CODES`].
    Off,
}

impl DayStatus {
    /// Classify a code.
    pub fn of(code: &str) -> Self {
        if is_non_work_code(code) {
            Self::Off
        } else {
            Self::Work
        }
    }
}

/// Validation failures for roster value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterValidationError {
    /// Month outside 1..=12.
    #[error("month must be between 1 and 12, got {month}")]
    InvalidMonth {
        /// Rejected value.
        month: u32,
    },
    /// Year outside the supported range.
    #[error("year must be between {min} and {max}, got {year}")]
    InvalidYear {
        /// Rejected value.
        year: i32,
        /// Lowest accepted year.
        min: i32,
        /// Highest accepted year.
        max: i32,
    },
    /// Day outside the month.
    #[error("day must be between 1 and {days_in_month}, got {day}")]
    InvalidDay {
        /// Rejected value.
        day: u32,
        /// Length of the month in question.
        days_in_month: u32,
    },
    /// Matricula blank after trimming.
    #[error("matricula must not be empty")]
    EmptyMatricula,
}

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// A calendar month of a given year.
///
/// # Examples
/// ```
/// use roster::domain::MonthYear;
///
/// let feb = MonthYear::new(2, 2024).unwrap();
/// assert_eq!(feb.days_in_month(), 29);
/// assert_eq!(feb.first_weekday(), 4); // Thursday, counted from Sunday
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "MonthYearDto", into = "MonthYearDto")]
pub struct MonthYear {
    year: i32,
    month: u32,
}

impl MonthYear {
    /// Validate and build a period.
    pub fn new(month: u32, year: i32) -> Result<Self, RosterValidationError> {
        if !(1..=12).contains(&month) {
            return Err(RosterValidationError::InvalidMonth { month });
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(RosterValidationError::InvalidYear {
                year,
                min: MIN_YEAR,
                max: MAX_YEAR,
            });
        }
        Ok(Self { year, month })
    }

    /// Period containing `date`.
    pub fn of_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Month number, 1..=12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Number of days in the month.
    pub fn days_in_month(&self) -> u32 {
        match self.month {
            2 if is_leap_year(self.year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Weekday of day 1, counted from Sunday = 0.
    ///
    /// This is the number of blank cells before day 1 in a Sunday-first grid.
    pub fn first_weekday(&self) -> u32 {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map_or(0, |date| date.weekday().num_days_from_sunday())
    }

    /// Whether `date` falls inside this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Check that `day` exists in this month.
    pub fn validate_day(&self, day: u32) -> Result<u32, RosterValidationError> {
        let days_in_month = self.days_in_month();
        if (1..=days_in_month).contains(&day) {
            Ok(day)
        } else {
            Err(RosterValidationError::InvalidDay { day, days_in_month })
        }
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[derive(Serialize, Deserialize)]
struct MonthYearDto {
    month: u32,
    year: i32,
}

impl From<MonthYear> for MonthYearDto {
    fn from(value: MonthYear) -> Self {
        Self {
            month: value.month,
            year: value.year,
        }
    }
}

impl TryFrom<MonthYearDto> for MonthYear {
    type Error = RosterValidationError;

    fn try_from(value: MonthYearDto) -> Result<Self, Self::Error> {
        Self::new(value.month, value.year)
    }
}

macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap a storage identifier.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_newtype! {
    /// Internal employee identifier.
    EmployeeId
}

uuid_newtype! {
    /// Internal schedule identifier.
    ScheduleId
}

/// Employee business identifier, unique across the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Matricula(String);

impl Matricula {
    /// Trim and validate a matricula.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RosterValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RosterValidationError::EmptyMatricula);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Matricula {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Matricula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Matricula> for String {
    fn from(value: Matricula) -> Self {
        value.0
    }
}

impl TryFrom<String> for Matricula {
    type Error = RosterValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One month's roster header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Storage identifier, stable across overwrites.
    pub id: ScheduleId,
    /// Month and year covered.
    #[serde(flatten)]
    pub period: MonthYear,
    /// Month label printed on the source document.
    pub month_name: Option<String>,
    /// Name of the uploaded file.
    pub source_filename: Option<String>,
}

/// Directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Storage identifier.
    pub id: EmployeeId,
    /// Business identifier.
    pub matricula: Matricula,
    /// Display name.
    pub name: String,
}

impl Employee {
    /// Label used by the employee picker: `"<matricula> - <name>"`.
    pub fn search_label(&self) -> String {
        format!("{} - {}", self.matricula, self.name)
    }
}

/// Assignment row joined with its employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    /// Owning schedule.
    pub schedule_id: ScheduleId,
    /// Assigned employee.
    pub employee_id: EmployeeId,
    /// Employee display name.
    pub employee_name: String,
    /// Employee business identifier.
    pub matricula: String,
    /// Sector (ward, unit) of the shift.
    pub sector: String,
    /// Job role printed on the roster.
    pub role: Option<String>,
    /// Shift hours printed on the roster.
    pub shift_hours: Option<String>,
    /// Day of month.
    pub day: u32,
    /// Shift or absence code.
    pub code: String,
}

impl AssignmentRecord {
    /// Work/off classification of this row.
    pub fn status(&self) -> DayStatus {
        DayStatus::of(&self.code)
    }
}

/// Global code dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeLegendEntry {
    /// Short code.
    pub code: String,
    /// Human-readable meaning.
    pub description: String,
}
