//! Builders choosing between Diesel adapters and fixtures for the HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use roster::domain::ports::{
    FixtureLoginService, FixtureProfileRepository, FixtureRosterImportRepository,
    FixtureRosterParser, FixtureRosterRepository, LoginService, ProfileRepository,
    RosterImportRepository, RosterParser, RosterRepository,
};
use roster::domain::{AccessService, RosterImportService, RosterQueryService};
use roster::inbound::http::health::Backing;
use roster::inbound::http::state::{HttpState, HttpStatePorts};
use roster::outbound::parser::{HttpRosterParser, effective_parser_url};
use roster::outbound::persistence::{
    DbPool, DieselLoginService, DieselProfileRepository, DieselRosterImportRepository,
    DieselRosterRepository,
};

use super::ServerConfig;

/// Storage-side ports sharing one backing.
struct StoragePorts {
    login: Arc<dyn LoginService>,
    profiles: Arc<dyn ProfileRepository>,
    roster: Arc<dyn RosterRepository>,
    writer: Arc<dyn RosterImportRepository>,
    backing: Backing,
}

fn build_storage(pool: Option<&DbPool>) -> StoragePorts {
    match pool {
        Some(pool) => {
            let profiles: Arc<dyn ProfileRepository> =
                Arc::new(DieselProfileRepository::new(pool.clone()));
            StoragePorts {
                login: Arc::new(DieselLoginService::new(profiles.clone())),
                profiles,
                roster: Arc::new(DieselRosterRepository::new(pool.clone())),
                writer: Arc::new(DieselRosterImportRepository::new(pool.clone())),
                backing: Backing::Postgres,
            }
        }
        None => {
            warn!("no database configured; serving fixture roster data");
            StoragePorts {
                login: Arc::new(FixtureLoginService),
                profiles: Arc::new(FixtureProfileRepository),
                roster: Arc::new(FixtureRosterRepository),
                writer: Arc::new(FixtureRosterImportRepository),
                backing: Backing::Fixture,
            }
        }
    }
}

/// Resolve the parser adapter.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the configured URL is malformed or the
/// HTTP client cannot be built. A missing URL selects the fixture parser.
fn build_parser(config: &ServerConfig) -> std::io::Result<(Arc<dyn RosterParser>, Backing)> {
    let url = config
        .parser_url
        .as_deref()
        .map(effective_parser_url)
        .transpose()
        .map_err(std::io::Error::other)?
        .flatten();
    match url {
        Some(url) => {
            info!(endpoint = %url, "using remote roster parser");
            let parser =
                HttpRosterParser::new(url, config.parser_timeout).map_err(std::io::Error::other)?;
            Ok((Arc::new(parser), Backing::Remote))
        }
        None => {
            warn!("no parser configured; uploads will be rejected");
            Ok((Arc::new(FixtureRosterParser), Backing::Fixture))
        }
    }
}

/// Backings reported by the readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Backings {
    pub storage: Backing,
    pub parser: Backing,
}

/// Assemble the handler state for `config`.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<(HttpState, Backings)> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let storage = build_storage(config.db_pool.as_ref());
    let (parser, parser_backing) = build_parser(config)?;

    let ports = HttpStatePorts {
        login: storage.login,
        access: Arc::new(AccessService::new(storage.profiles)),
        roster: Arc::new(RosterQueryService::new(
            storage.roster.clone(),
            clock.clone(),
        )),
        imports: Arc::new(RosterImportService::new(
            parser,
            storage.roster,
            storage.writer,
        )),
    };
    let backings = Backings {
        storage: storage.backing,
        parser: parser_backing,
    };
    Ok((HttpState::with_clock(ports, clock), backings))
}
