//! PostgreSQL persistence adapters using Diesel with `diesel-async` and `bb8`.
//!
//! Adapters translate between Diesel rows (`models.rs`, `schema.rs`) and
//! domain types. Neither rows nor schema leave this module, and every
//! database failure is mapped to the owning port's error type.
//!
//! ```ignore
//! use roster::outbound::persistence::{DbPool, DieselRosterRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/roster")).await?;
//! let repo = DieselRosterRepository::new(pool);
//! ```

mod diesel_login_service;
mod diesel_profile_repository;
mod diesel_roster_import_repository;
mod diesel_roster_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_login_service::DieselLoginService;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_roster_import_repository::DieselRosterImportRepository;
pub use diesel_roster_repository::DieselRosterRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
