//! `PostgreSQL` recycle-bin repository.

use super::{
    models::{NewRecycleBinRow, RecycleBinRow},
    schema::recycle_bin,
};
use crate::postgres::{PgPool, get_conn_with, run_blocking_with};
use crate::recycle_bin::{
    domain::{
        EntityType, NewRecycleBinEntry, PersistedRecycleBinEntryData, RecycleBinEntry, RecycleId,
    },
    ports::{RecycleBinRepository, RecycleBinRepositoryError, RecycleBinRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::HashSet;

/// Name of the unique index enforcing one live entry per entity.
const ENTITY_UNIQUE_INDEX: &str = "idx_recycle_bin_entity_unique";

/// `PostgreSQL`-backed recycle bin.
#[derive(Debug, Clone)]
pub struct PostgresRecycleBin {
    pool: PgPool,
}

impl PostgresRecycleBin {
    /// Creates a repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> RecycleBinRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RecycleBinRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection =
                    get_conn_with(&pool, RecycleBinRepositoryError::persistence)?;
                f(&mut connection)
            },
            RecycleBinRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for RecycleBinRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl RecycleBinRepository for PostgresRecycleBin {
    async fn archive_all(
        &self,
        entries: &[NewRecycleBinEntry],
    ) -> RecycleBinRepositoryResult<Vec<RecycleBinEntry>> {
        let rows: Vec<NewRecycleBinRow> = entries.iter().map(to_new_row).collect();
        self.run(move |connection| {
            connection.transaction::<_, RecycleBinRepositoryError, _>(|tx| {
                let mut seen = HashSet::with_capacity(rows.len());
                let mut stored = Vec::with_capacity(rows.len());
                for row in &rows {
                    if !seen.insert((row.entity_type.as_str(), row.entity_id)) {
                        return Err(duplicate(row));
                    }
                    // Pre-check for a semantic error; the unique index still
                    // guards the window between check and insert.
                    let existing: i64 = recycle_bin::table
                        .filter(recycle_bin::entity_type.eq(row.entity_type.as_str()))
                        .filter(recycle_bin::entity_id.eq(row.entity_id))
                        .count()
                        .get_result(tx)?;
                    if existing > 0 {
                        return Err(duplicate(row));
                    }
                    let inserted = diesel::insert_into(recycle_bin::table)
                        .values(row)
                        .returning(RecycleBinRow::as_returning())
                        .get_result::<RecycleBinRow>(tx)
                        .map_err(|err| match err {
                            DieselError::DatabaseError(
                                DatabaseErrorKind::UniqueViolation,
                                ref info,
                            ) if is_entity_unique_violation(info.as_ref()) => duplicate(row),
                            _ => RecycleBinRepositoryError::persistence(err),
                        })?;
                    stored.push(row_to_entry(inserted)?);
                }
                Ok(stored)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: RecycleId) -> RecycleBinRepositoryResult<Option<RecycleBinEntry>> {
        self.run(move |connection| {
            let row = recycle_bin::table
                .filter(recycle_bin::id.eq(id.value()))
                .select(RecycleBinRow::as_select())
                .first::<RecycleBinRow>(connection)
                .optional()?;
            row.map(row_to_entry).transpose()
        })
        .await
    }

    async fn find_by_entity(
        &self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> RecycleBinRepositoryResult<Option<RecycleBinEntry>> {
        self.run(move |connection| {
            let row = recycle_bin::table
                .filter(recycle_bin::entity_type.eq(entity_type.as_str()))
                .filter(recycle_bin::entity_id.eq(entity_id))
                .select(RecycleBinRow::as_select())
                .first::<RecycleBinRow>(connection)
                .optional()?;
            row.map(row_to_entry).transpose()
        })
        .await
    }

    async fn list_by_type(
        &self,
        entity_type: EntityType,
    ) -> RecycleBinRepositoryResult<Vec<RecycleBinEntry>> {
        self.run(move |connection| {
            recycle_bin::table
                .filter(recycle_bin::entity_type.eq(entity_type.as_str()))
                .select(RecycleBinRow::as_select())
                .load::<RecycleBinRow>(connection)?
                .into_iter()
                .map(row_to_entry)
                .collect()
        })
        .await
    }

    async fn archived_ids(&self, entity_type: EntityType) -> RecycleBinRepositoryResult<HashSet<i64>> {
        self.run(move |connection| {
            let ids = recycle_bin::table
                .filter(recycle_bin::entity_type.eq(entity_type.as_str()))
                .select(recycle_bin::entity_id)
                .load::<i64>(connection)?;
            Ok(ids.into_iter().collect())
        })
        .await
    }

    async fn remove(&self, id: RecycleId) -> RecycleBinRepositoryResult<RecycleBinEntry> {
        self.run(move |connection| {
            let row = diesel::delete(recycle_bin::table.filter(recycle_bin::id.eq(id.value())))
                .returning(RecycleBinRow::as_returning())
                .get_result::<RecycleBinRow>(connection)
                .optional()?
                .ok_or(RecycleBinRepositoryError::NotFound(id))?;
            row_to_entry(row)
        })
        .await
    }
}

fn duplicate(row: &NewRecycleBinRow) -> RecycleBinRepositoryError {
    match EntityType::try_from(row.entity_type.as_str()) {
        Ok(entity_type) => RecycleBinRepositoryError::DuplicateEntry {
            entity_type,
            entity_id: row.entity_id,
        },
        Err(err) => RecycleBinRepositoryError::invalid_persisted_data(err),
    }
}

fn is_entity_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == ENTITY_UNIQUE_INDEX)
}

fn to_new_row(entry: &NewRecycleBinEntry) -> NewRecycleBinRow {
    NewRecycleBinRow {
        entity_type: entry.entity_type().as_str().to_owned(),
        entity_id: entry.entity_id(),
        snapshot: entry.snapshot().clone(),
        deleted_by: entry.deleted_by().value(),
        deleted_at: entry.deleted_at(),
    }
}

fn row_to_entry(row: RecycleBinRow) -> RecycleBinRepositoryResult<RecycleBinEntry> {
    let entity_type = EntityType::try_from(row.entity_type.as_str())
        .map_err(RecycleBinRepositoryError::invalid_persisted_data)?;
    Ok(RecycleBinEntry::from_persisted(PersistedRecycleBinEntryData {
        id: RecycleId::new(row.id),
        entity_type,
        entity_id: row.entity_id,
        snapshot: row.snapshot,
        deleted_by: UserId::new(row.deleted_by),
        deleted_at: row.deleted_at,
    }))
}
