//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod access_query;
mod login_service;
mod profile_repository;
mod roster_import_command;
mod roster_import_repository;
mod roster_parser;
mod roster_query;
mod roster_repository;

#[cfg(test)]
pub use access_query::MockAccessQuery;
pub use access_query::AccessQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    FIXTURE_ADMIN_ID, FIXTURE_ADMIN_USERNAME, FixtureLoginService, LoginService,
};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{
    FIXTURE_ADMIN_EMAIL, FixtureProfileRepository, ProfileRepository, ProfileRepositoryError,
};
#[cfg(test)]
pub use roster_import_command::MockRosterImportCommand;
pub use roster_import_command::{ParsePreview, RosterImportCommand, SaveRosterRequest};
#[cfg(test)]
pub use roster_import_repository::MockRosterImportRepository;
pub use roster_import_repository::{
    FixtureRosterImportRepository, RosterImportRepository, RosterImportRepositoryError,
};
#[cfg(test)]
pub use roster_parser::MockRosterParser;
pub use roster_parser::{FixtureRosterParser, RosterDocument, RosterParser, RosterParserError};
#[cfg(test)]
pub use roster_query::MockRosterQuery;
pub use roster_query::RosterQuery;
#[cfg(test)]
pub use roster_repository::MockRosterRepository;
pub use roster_repository::{FixtureRosterRepository, RosterRepository, RosterRepositoryError};
