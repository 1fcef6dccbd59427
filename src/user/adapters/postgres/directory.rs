//! `PostgreSQL` user directory.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::postgres::{PgPool, get_conn_with, run_blocking_with};
use crate::user::{
    domain::{Role, User, UserId},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};
use async_trait::async_trait;
use diesel::prelude::*;

/// `PostgreSQL`-backed user directory.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a user and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError`] when the insert fails or the stored row
    /// cannot be read back.
    pub async fn register(
        &self,
        display_name: impl Into<String>,
        role: Role,
    ) -> UserDirectoryResult<User> {
        let pool = self.pool.clone();
        let new_row = NewUserRow {
            display_name: display_name.into().trim().to_owned(),
            role: role.as_str().to_owned(),
        };
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, UserDirectoryError::persistence)?;
                let row = diesel::insert_into(users::table)
                    .values(&new_row)
                    .returning(UserRow::as_returning())
                    .get_result::<UserRow>(&mut connection)
                    .map_err(UserDirectoryError::persistence)?;
                row_to_user(row)
            },
            UserDirectoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_user(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, UserDirectoryError::persistence)?;
                let row = users::table
                    .filter(users::id.eq(id.value()))
                    .select(UserRow::as_select())
                    .first::<UserRow>(&mut connection)
                    .optional()
                    .map_err(UserDirectoryError::persistence)?;
                row.map(row_to_user).transpose()
            },
            UserDirectoryError::persistence,
        )
        .await
    }
}

fn row_to_user(row: UserRow) -> UserDirectoryResult<User> {
    let role =
        Role::try_from(row.role.as_str()).map_err(UserDirectoryError::invalid_persisted_data)?;
    User::new(UserId::new(row.id), row.display_name, role)
        .map_err(UserDirectoryError::invalid_persisted_data)
}
