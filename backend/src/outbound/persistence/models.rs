//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; conversions into domain types
//! live next to the structs.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AssignmentRecord, CodeLegendEntry, Employee, EmployeeId, Matricula, MonthYear, Profile,
    Schedule, ScheduleId, UserId,
};

use super::schema::{assignments, code_legend, employees, profiles, schedules};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.user_id),
            email: row.email,
            is_admin: row.is_admin,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub user_id: Uuid,
    pub email: Option<&'a str>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmployeeRow {
    pub id: Uuid,
    pub matricula: String,
    pub name: String,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = String;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let matricula = Matricula::new(&row.matricula)
            .map_err(|err| format!("employee {}: {err}", row.id))?;
        Ok(Self {
            id: EmployeeId::from_uuid(row.id),
            matricula,
            name: row.name,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = employees)]
pub(crate) struct NewEmployeeRow<'a> {
    pub id: Uuid,
    pub matricula: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScheduleRow {
    pub id: Uuid,
    pub month: i32,
    pub year: i32,
    pub month_name: Option<String>,
    pub source_filename: Option<String>,
}

impl TryFrom<ScheduleRow> for Schedule {
    type Error = String;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        let month = u32::try_from(row.month).map_err(|_| format!("schedule {}: bad month", row.id))?;
        let period =
            MonthYear::new(month, row.year).map_err(|err| format!("schedule {}: {err}", row.id))?;
        Ok(Self {
            id: ScheduleId::from_uuid(row.id),
            period,
            month_name: row.month_name,
            source_filename: row.source_filename,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schedules)]
pub(crate) struct NewScheduleRow<'a> {
    pub id: Uuid,
    pub month: i32,
    pub year: i32,
    pub month_name: Option<&'a str>,
    pub source_filename: Option<&'a str>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schedules)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ScheduleUpdate<'a> {
    pub month_name: Option<&'a str>,
    pub source_filename: Option<&'a str>,
}

/// Assignment joined with its employee's name and matricula.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct AssignmentJoinRow {
    pub schedule_id: Uuid,
    pub employee_id: Uuid,
    pub sector: String,
    pub role: Option<String>,
    pub shift_hours: Option<String>,
    pub day: i32,
    pub code: String,
    pub employee_name: String,
    pub matricula: String,
}

impl TryFrom<AssignmentJoinRow> for AssignmentRecord {
    type Error = String;

    fn try_from(row: AssignmentJoinRow) -> Result<Self, Self::Error> {
        let day = u32::try_from(row.day).map_err(|_| format!("assignment day {} invalid", row.day))?;
        Ok(Self {
            schedule_id: ScheduleId::from_uuid(row.schedule_id),
            employee_id: EmployeeId::from_uuid(row.employee_id),
            employee_name: row.employee_name,
            matricula: row.matricula,
            sector: row.sector,
            role: row.role,
            shift_hours: row.shift_hours,
            day,
            code: row.code,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assignments)]
pub(crate) struct NewAssignmentRow<'a> {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub employee_id: Uuid,
    pub sector: &'a str,
    pub role: Option<&'a str>,
    pub shift_hours: Option<&'a str>,
    pub day: i32,
    pub code: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = code_legend)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CodeLegendRow {
    pub code: String,
    pub description: String,
}

impl From<CodeLegendRow> for CodeLegendEntry {
    fn from(row: CodeLegendRow) -> Self {
        Self {
            code: row.code,
            description: row.description,
        }
    }
}

impl From<&CodeLegendEntry> for CodeLegendRow {
    fn from(entry: &CodeLegendEntry) -> Self {
        Self {
            code: entry.code.clone(),
            description: entry.description.clone(),
        }
    }
}
