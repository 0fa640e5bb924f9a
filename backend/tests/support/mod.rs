//! Shared helpers for the backend integration suites.
//!
//! Integration tests compile as separate crates under `backend/tests/`; suites
//! that need a real database pull these helpers in with `mod support;`.

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{provision_template_database, shared_cluster};
