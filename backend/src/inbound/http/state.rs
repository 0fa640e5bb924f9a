//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see driving ports, so they
//! stay testable without storage or network access.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    AccessQuery, FixtureLoginService, FixtureProfileRepository, FixtureRosterImportRepository,
    FixtureRosterParser, FixtureRosterRepository, LoginService, RosterImportCommand, RosterQuery,
};
use crate::domain::{AccessService, RosterImportService, RosterQueryService};

/// Port implementations used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub access: Arc<dyn AccessQuery>,
    pub roster: Arc<dyn RosterQuery>,
    pub imports: Arc<dyn RosterImportCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub access: Arc<dyn AccessQuery>,
    pub roster: Arc<dyn RosterQuery>,
    pub imports: Arc<dyn RosterImportCommand>,
    /// Decides the default month when a request names none.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state using the system clock.
    pub fn new(ports: HttpStatePorts) -> Self {
        Self::with_clock(ports, Arc::new(DefaultClock))
    }

    /// Construct state with an explicit clock.
    pub fn with_clock(ports: HttpStatePorts, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            login,
            access,
            roster,
            imports,
        } = ports;
        Self {
            login,
            access,
            roster,
            imports,
            clock,
        }
    }

    /// State backed entirely by fixtures: empty reads, the development
    /// login, and imports that report storage as unavailable.
    ///
    /// # Examples
    /// ```
    /// use roster::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::fixture();
    /// let _roster = state.roster.clone();
    /// ```
    pub fn fixture() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let roster = Arc::new(FixtureRosterRepository);
        Self::with_clock(
            HttpStatePorts {
                login: Arc::new(FixtureLoginService),
                access: Arc::new(AccessService::new(Arc::new(FixtureProfileRepository))),
                roster: Arc::new(RosterQueryService::new(roster.clone(), clock.clone())),
                imports: Arc::new(RosterImportService::new(
                    Arc::new(FixtureRosterParser),
                    roster,
                    Arc::new(FixtureRosterImportRepository),
                )),
            },
            clock,
        )
    }
}
