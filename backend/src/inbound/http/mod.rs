//! HTTP inbound adapter exposing the roster REST endpoints.

pub mod auth;
pub mod calendar;
pub mod employees;
pub mod error;
pub mod health;
pub mod imports;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
