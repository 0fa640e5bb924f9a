//! Test doubles shared by unit and integration tests.
//!
//! Compiled only with the `test-support` feature.

pub mod roster_store;

pub use roster_store::InMemoryRosterStore;

use serde_json::{Value, json};

/// Parser payload for one month with a single sector.
///
/// `employees` holds `(matricula, name, [(day, code)])` tuples.
pub fn payload_for(
    month: u32,
    year: i32,
    sector: &str,
    employees: &[(&str, &str, &[(u32, &str)])],
) -> Value {
    let employees: Vec<Value> = employees
        .iter()
        .map(|(matricula, name, days)| {
            let days: serde_json::Map<String, Value> = days
                .iter()
                .map(|(day, code)| (day.to_string(), Value::from(*code)))
                .collect();
            json!({ "matricula": matricula, "name": name, "days": days })
        })
        .collect();
    json!({
        "metadata": { "month": month, "year": year, "month_name": null },
        "sectors": [{ "name": sector, "employees": employees }],
        "legend": {}
    })
}
