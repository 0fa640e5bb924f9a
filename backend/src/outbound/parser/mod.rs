//! Roster document parser adapters.
//!
//! A thin reqwest implementation of the `RosterParser` port that uploads the
//! file as a multipart form and hands the JSON body back to the domain.

mod http_client;

pub use http_client::{HttpRosterParser, ParserUrlError, effective_parser_url};
