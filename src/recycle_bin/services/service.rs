//! Listing, restoring, and purging recycle-bin entries.

use crate::project::{
    domain::ProjectId,
    ports::ProjectRepository,
    services::{ProjectStatusAggregator, ProjectStatusError},
};
use crate::recycle_bin::{
    domain::{EntityType, RecycleBinEntry, RecycleId, UNKNOWN_USER},
    ports::{RecycleBinRepository, RecycleBinRepositoryError},
};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use crate::user::{
    domain::{AccessDenied, Actor, Permission, UserId},
    ports::{UserDirectory, UserDirectoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// One row of a recycle-bin listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecycleBinListing {
    /// Entry identifier used for restore and purge.
    pub id: RecycleId,
    /// Kind of the deleted entity.
    pub entity_type: EntityType,
    /// Identifier of the deleted entity.
    pub entity_id: i64,
    /// Name from the snapshot.
    pub name: String,
    /// Owner from the snapshot.
    pub owner: String,
    /// Status from the snapshot.
    pub status: String,
    /// Display name of the user who deleted the entity.
    pub deleted_by_name: String,
    /// Deletion time.
    pub deleted_at: DateTime<Utc>,
}

/// Errors returned by [`RecycleBinService`].
#[derive(Debug, Error)]
pub enum RecycleBinServiceError {
    /// No entry has the identifier.
    #[error("recycle bin entry not found: {0}")]
    NotFound(RecycleId),
    /// The acting user may not manage the recycle bin.
    #[error(transparent)]
    Unauthorized(#[from] AccessDenied),
    /// Recycle-bin repository operation failed.
    #[error(transparent)]
    Repository(#[from] RecycleBinRepositoryError),
    /// Task repository operation failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
    /// User directory lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),
    /// Project status recomputation failed.
    #[error(transparent)]
    ProjectStatus(#[from] ProjectStatusError),
}

/// Result type for recycle-bin service operations.
pub type RecycleBinServiceResult<T> = Result<T, RecycleBinServiceError>;

/// Recycle-bin listing, restore, and purge service.
#[derive(Clone)]
pub struct RecycleBinService<T, B, P, D, C>
where
    T: TaskRepository,
    B: RecycleBinRepository,
    P: ProjectRepository,
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    recycle_bin: Arc<B>,
    directory: Arc<D>,
    clock: Arc<C>,
    aggregator: ProjectStatusAggregator<T, B, P, C>,
}

impl<T, B, P, D, C> RecycleBinService<T, B, P, D, C>
where
    T: TaskRepository,
    B: RecycleBinRepository,
    P: ProjectRepository,
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new recycle-bin service.
    #[must_use]
    pub fn new(
        tasks: Arc<T>,
        recycle_bin: Arc<B>,
        projects: Arc<P>,
        directory: Arc<D>,
        clock: Arc<C>,
    ) -> Self {
        let aggregator = ProjectStatusAggregator::new(
            Arc::clone(&tasks),
            Arc::clone(&recycle_bin),
            projects,
            Arc::clone(&clock),
        );
        Self {
            tasks,
            recycle_bin,
            directory,
            clock,
            aggregator,
        }
    }

    /// Lists entries of one entity type, most recently deleted first.
    ///
    /// Entries deleted at the same instant are ordered by identifier,
    /// highest first. Missing snapshot fields and unresolvable users are
    /// shown with fallback text.
    ///
    /// # Errors
    ///
    /// Returns [`RecycleBinServiceError`] when a lookup fails.
    pub async fn list_entries(
        &self,
        entity_type: EntityType,
    ) -> RecycleBinServiceResult<Vec<RecycleBinListing>> {
        let mut entries = self.recycle_bin.list_by_type(entity_type).await?;
        entries.sort_by_key(|entry| Reverse((entry.deleted_at(), entry.id())));

        let mut names: HashMap<UserId, String> = HashMap::new();
        let mut listings = Vec::with_capacity(entries.len());
        for entry in entries {
            let deleted_by = entry.deleted_by();
            let deleted_by_name = match names.get(&deleted_by) {
                Some(name) => name.clone(),
                None => {
                    let name = self.display_name(deleted_by).await?;
                    names.insert(deleted_by, name.clone());
                    name
                }
            };
            let summary = entry.summary();
            listings.push(RecycleBinListing {
                id: entry.id(),
                entity_type: entry.entity_type(),
                entity_id: entry.entity_id(),
                name: summary.name,
                owner: summary.owner,
                status: summary.status,
                deleted_by_name,
                deleted_at: entry.deleted_at(),
            });
        }
        Ok(listings)
    }

    /// Finds an entry by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RecycleBinServiceError::Repository`] when the lookup fails.
    pub async fn find_entry(&self, id: RecycleId) -> RecycleBinServiceResult<Option<RecycleBinEntry>> {
        Ok(self.recycle_bin.find_by_id(id).await?)
    }

    /// Returns whether an entity has no live entry.
    ///
    /// # Errors
    ///
    /// Returns [`RecycleBinServiceError::Repository`] when the lookup fails.
    pub async fn is_active(
        &self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> RecycleBinServiceResult<bool> {
        let entry = self.recycle_bin.find_by_entity(entity_type, entity_id).await?;
        Ok(entry.is_none())
    }

    /// Restores a deleted entity by removing its entry.
    ///
    /// Only the entry's own entity is reactivated; descendants deleted with
    /// it keep their own entries.
    ///
    /// # Errors
    ///
    /// Returns [`RecycleBinServiceError::NotFound`] when no entry has the
    /// identifier, or [`RecycleBinServiceError::Unauthorized`] when the
    /// actor may not manage the recycle bin.
    pub async fn restore(
        &self,
        actor: Actor,
        id: RecycleId,
    ) -> RecycleBinServiceResult<RecycleBinEntry> {
        authorize(actor, id)?;
        let entry = self.recycle_bin.remove(id).await.map_err(|err| not_found(err, id))?;
        let project_id = self.affected_project(&entry).await?;
        self.recompute(project_id).await?;
        info!(
            recycle_id = %id,
            entity_type = %entry.entity_type(),
            entity_id = entry.entity_id(),
            by = %actor.user_id(),
            "entry restored"
        );
        Ok(entry)
    }

    /// Permanently deletes an entity and its entry.
    ///
    /// The entry is claimed before the row is touched, so a concurrent
    /// restore either wins outright or finds nothing to restore. Surviving
    /// children of a purged task are detached and a parent left without
    /// children loses its parent flag. The entry is removed even when the
    /// task row is already gone. When the row delete fails the entry is
    /// archived again under a new identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RecycleBinServiceError::NotFound`] when no entry has the
    /// identifier, or [`RecycleBinServiceError::Unauthorized`] when the
    /// actor may not manage the recycle bin.
    pub async fn delete_permanent(
        &self,
        actor: Actor,
        id: RecycleId,
    ) -> RecycleBinServiceResult<RecycleBinEntry> {
        authorize(actor, id)?;
        let removed = self.recycle_bin.remove(id).await.map_err(|err| not_found(err, id))?;
        let project_id = match self.purge_claimed(&removed).await {
            Ok(project_id) => project_id,
            Err(err) => {
                self.reinstate(&removed).await;
                return Err(err);
            }
        };
        self.recompute(project_id).await?;
        info!(
            recycle_id = %id,
            entity_type = %removed.entity_type(),
            entity_id = removed.entity_id(),
            by = %actor.user_id(),
            "entry purged"
        );
        Ok(removed)
    }

    async fn purge_claimed(
        &self,
        entry: &RecycleBinEntry,
    ) -> RecycleBinServiceResult<Option<ProjectId>> {
        let project_id = self.affected_project(entry).await?;
        if let Some(task_id) = entry.task_id() {
            match self.tasks.delete(task_id, self.clock.utc()).await {
                Ok(()) | Err(TaskRepositoryError::NotFound(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(project_id)
    }

    async fn reinstate(&self, entry: &RecycleBinEntry) {
        match self.recycle_bin.archive_all(&[entry.to_new_entry()]).await {
            Ok(stored) => warn!(
                recycle_id = %entry.id(),
                reinstated = ?stored.first().map(RecycleBinEntry::id),
                "purge failed; entry archived again"
            ),
            Err(err) => warn!(
                recycle_id = %entry.id(),
                entity_id = entry.entity_id(),
                error = %err,
                "purge failed and the entry could not be archived again"
            ),
        }
    }

    async fn display_name(&self, user_id: UserId) -> RecycleBinServiceResult<String> {
        let user = self.directory.find_user(user_id).await?;
        Ok(user.map_or_else(
            || UNKNOWN_USER.to_owned(),
            |found| found.display_name().to_owned(),
        ))
    }

    async fn affected_project(
        &self,
        entry: &RecycleBinEntry,
    ) -> RecycleBinServiceResult<Option<ProjectId>> {
        if let Some(project_id) = entry.summary().project_id {
            return Ok(Some(project_id));
        }
        let Some(task_id) = entry.task_id() else {
            return Ok(None);
        };
        let task = self.tasks.find_by_id(task_id).await?;
        Ok(task.map(|found| found.project_id()))
    }

    async fn recompute(&self, project_id: Option<ProjectId>) -> RecycleBinServiceResult<()> {
        let Some(project_id) = project_id else {
            return Ok(());
        };
        match self.aggregator.recompute(project_id).await {
            Ok(_) => Ok(()),
            Err(ProjectStatusError::ProjectNotFound(missing)) => {
                warn!(project_id = %missing, "snapshot references a missing project");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn authorize(actor: Actor, id: RecycleId) -> Result<(), AccessDenied> {
    actor.authorize(Permission::ManageRecycleBin).inspect_err(|_| {
        warn!(recycle_id = %id, user = %actor.user_id(), "recycle bin request denied");
    })
}

fn not_found(err: RecycleBinRepositoryError, id: RecycleId) -> RecycleBinServiceError {
    match err {
        RecycleBinRepositoryError::NotFound(_) => RecycleBinServiceError::NotFound(id),
        other => other.into(),
    }
}
