//! Diesel table definitions for the roster schema.
//!
//! These must match `migrations/` exactly; `diesel print-schema` against a
//! migrated database regenerates them.

diesel::table! {
    /// Per-user profile carrying the admin flag.
    profiles (user_id) {
        user_id -> Uuid,
        email -> Nullable<Text>,
        is_admin -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Employee directory keyed by matricula.
    employees (id) {
        id -> Uuid,
        matricula -> Text,
        name -> Text,
    }
}

diesel::table! {
    /// One row per imported month; `(month, year)` is unique.
    schedules (id) {
        id -> Uuid,
        month -> Int4,
        year -> Int4,
        month_name -> Nullable<Text>,
        source_filename -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Day assignments; `(schedule_id, employee_id, sector, day)` is unique.
    assignments (id) {
        id -> Uuid,
        schedule_id -> Uuid,
        employee_id -> Uuid,
        sector -> Text,
        role -> Nullable<Text>,
        shift_hours -> Nullable<Text>,
        day -> Int4,
        code -> Text,
    }
}

diesel::table! {
    /// Global code dictionary.
    code_legend (code) {
        code -> Text,
        description -> Text,
    }
}

diesel::joinable!(assignments -> employees (employee_id));
diesel::joinable!(assignments -> schedules (schedule_id));

diesel::allow_tables_to_appear_in_same_query!(
    assignments,
    code_legend,
    employees,
    profiles,
    schedules,
);
