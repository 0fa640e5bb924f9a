//! PostgreSQL-backed profile storage.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{Profile, UserId};

use super::error_mapping::{map_diesel_error, pool_message};
use super::models::{NewProfileRow, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed implementation of [`ProfileRepository`].
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProfileRepositoryError {
    ProfileRepositoryError::connection(pool_message(error))
}

fn map_query_error(error: diesel::result::Error) -> ProfileRepositoryError {
    map_diesel_error(
        error,
        |message| ProfileRepositoryError::query(message),
        |message| ProfileRepositoryError::connection(message),
    )
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        profiles::table
            .find(*user_id.as_uuid())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Profile::from))
            .map_err(map_query_error)
    }

    async fn upsert(&self, profile: &Profile) -> Result<(), ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewProfileRow {
            user_id: *profile.user_id.as_uuid(),
            email: profile.email.as_deref(),
            is_admin: profile.is_admin,
        };
        diesel::insert_into(profiles::table)
            .values(&row)
            .on_conflict(profiles::user_id)
            .do_update()
            .set((
                profiles::email.eq(excluded(profiles::email)),
                profiles::is_admin.eq(excluded(profiles::is_admin)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_query_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};
    use rstest::rstest;

    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[rstest]
    fn closed_connections_become_connection_errors() {
        let err = map_query_error(diesel::result::Error::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new(Info("server closed the connection")),
        ));
        assert_eq!(
            err,
            ProfileRepositoryError::connection("server closed the connection")
        );
    }

    #[rstest]
    fn pool_timeouts_become_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, ProfileRepositoryError::connection("timed out"));
    }
}
