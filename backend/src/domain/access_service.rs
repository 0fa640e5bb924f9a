//! Access resolution backed by the profile repository.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{AccessQuery, ProfileRepository, ProfileRepositoryError};
use crate::domain::{AccessContext, Error, UserId};

/// Implements [`AccessQuery`] by reading the session user's profile.
#[derive(Clone)]
pub struct AccessService<P: ?Sized> {
    profiles: Arc<P>,
}

impl<P: ?Sized> AccessService<P> {
    /// Create the service.
    pub fn new(profiles: Arc<P>) -> Self {
        Self { profiles }
    }
}

pub(crate) fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } => {
            Error::storage(format!("profile repository error: {message}"))
        }
    }
}

#[async_trait]
impl<P> AccessQuery for AccessService<P>
where
    P: ProfileRepository + ?Sized,
{
    async fn resolve(&self, user_id: Option<UserId>) -> Result<AccessContext, Error> {
        let Some(user_id) = user_id else {
            return Ok(AccessContext::Anonymous);
        };
        let profile = self
            .profiles
            .find_by_user_id(&user_id)
            .await
            .map_err(map_profile_error)?;
        Ok(AccessContext::from_profile(user_id, profile))
    }
}
