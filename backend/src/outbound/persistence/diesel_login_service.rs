//! Login adapter that records the fixture administrator's profile in
//! PostgreSQL on first sign-in.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    FIXTURE_ADMIN_EMAIL, FixtureLoginService, LoginService, ProfileRepository,
};
use crate::domain::access_service::map_profile_error;
use crate::domain::{Error, LoginCredentials, Profile, UserId};

/// `LoginService` that keeps the fixture credential check and ensures the
/// authenticated administrator has an admin profile row.
#[derive(Clone)]
pub struct DieselLoginService {
    profiles: Arc<dyn ProfileRepository>,
}

impl DieselLoginService {
    /// Create a service writing through `profiles`.
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    async fn ensure_admin_profile(&self, user_id: &UserId) -> Result<(), Error> {
        let existing = self
            .profiles
            .find_by_user_id(user_id)
            .await
            .map_err(map_profile_error)?;
        if existing.is_some() {
            return Ok(());
        }

        let profile = Profile {
            user_id: user_id.clone(),
            email: Some(FIXTURE_ADMIN_EMAIL.to_owned()),
            is_admin: true,
        };
        self.profiles
            .upsert(&profile)
            .await
            .map_err(map_profile_error)
    }
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let user_id = FixtureLoginService.authenticate(credentials).await?;
        self.ensure_admin_profile(&user_id).await?;
        Ok(user_id)
    }
}
