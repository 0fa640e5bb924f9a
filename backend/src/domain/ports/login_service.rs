//! Driving port for login.
//!
//! Handlers authenticate credentials through this port without knowing which
//! identity collaborator backs it.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, LoginCredentials, UserId};

/// Username accepted by the development login service.
pub const FIXTURE_ADMIN_USERNAME: &str = "admin";
const FIXTURE_ADMIN_PASSWORD: &str = "password";
/// User id issued for the development administrator.
pub const FIXTURE_ADMIN_ID: Uuid = Uuid::from_u128(0x123e4567_e89b_12d3_a456_426614174000);

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Development authenticator: `admin` / `password` only.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

impl FixtureLoginService {
    /// Whether the credentials are the fixture administrator's.
    pub fn accepts(credentials: &LoginCredentials) -> bool {
        credentials.username() == FIXTURE_ADMIN_USERNAME
            && credentials.password() == FIXTURE_ADMIN_PASSWORD
    }
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if Self::accepts(credentials) {
            Ok(UserId::from_uuid(FIXTURE_ADMIN_ID))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
