//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel
//! - **parser**: the HTTP document parser client
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business logic.

pub mod parser;
pub mod persistence;
