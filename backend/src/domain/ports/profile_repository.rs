//! Port for the profiles table carrying the admin flag.

use async_trait::async_trait;

use crate::domain::{Profile, UserId};

use super::define_port_error;
use super::login_service::FIXTURE_ADMIN_ID;

define_port_error! {
    /// Persistence errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
    }
}

/// Profile persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile of a user, if one exists.
    async fn find_by_user_id(&self, user_id: &UserId)
    -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Insert or update a profile.
    async fn upsert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError>;
}

/// Profiles without storage: only the fixture administrator exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileRepository;

#[async_trait]
impl ProfileRepository for FixtureProfileRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        Ok((*user_id.as_uuid() == FIXTURE_ADMIN_ID).then(|| Profile {
            user_id: user_id.clone(),
            email: Some(FIXTURE_ADMIN_EMAIL.to_owned()),
            is_admin: true,
        }))
    }

    async fn upsert(&self, _profile: &Profile) -> Result<(), ProfileRepositoryError> {
        Ok(())
    }
}

/// Email recorded for the development administrator.
pub const FIXTURE_ADMIN_EMAIL: &str = "admin@roster.invalid";
