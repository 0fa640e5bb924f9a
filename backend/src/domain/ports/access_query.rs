//! Driving port resolving the visitor's access level.

use async_trait::async_trait;

use crate::domain::{AccessContext, Error, UserId};

/// Resolve the session user into an [`AccessContext`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessQuery: Send + Sync {
    /// `None` yields [`AccessContext::Anonymous`].
    async fn resolve(&self, user_id: Option<UserId>) -> Result<AccessContext, Error>;
}
