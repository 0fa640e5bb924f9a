//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{
    FixtureLoginService, MockAccessQuery, MockRosterImportCommand, MockRosterQuery,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Session middleware with a fresh key, cookie name `session` and the
/// `Secure` flag off for plain-HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Clock pinned to midday UTC of one date.
pub struct FixtureClock {
    pub utc_now: DateTime<Utc>,
}

impl FixtureClock {
    pub fn at(year: i32, month: u32, day: u32) -> Self {
        let utc_now = Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        Self { utc_now }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Mocks for every driving port; tests set expectations then call
/// [`MockPorts::into_state`].
pub struct MockPorts {
    pub access: MockAccessQuery,
    pub roster: MockRosterQuery,
    pub imports: MockRosterImportCommand,
}

impl Default for MockPorts {
    fn default() -> Self {
        Self {
            access: MockAccessQuery::new(),
            roster: MockRosterQuery::new(),
            imports: MockRosterImportCommand::new(),
        }
    }
}

impl MockPorts {
    /// State using the fixture login and a clock fixed on 15 March 2024.
    pub fn into_state(self) -> HttpState {
        HttpState::with_clock(
            HttpStatePorts {
                login: Arc::new(FixtureLoginService),
                access: Arc::new(self.access),
                roster: Arc::new(self.roster),
                imports: Arc::new(self.imports),
            },
            Arc::new(FixtureClock::at(2024, 3, 15)),
        )
    }
}
