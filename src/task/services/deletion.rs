//! Recursive soft deletion of task subtrees.
//!
//! The engine only computes the archive writes. It never persists them and
//! never recomputes project status, so a failure anywhere in the subtree
//! leaves storage untouched.

use crate::project::domain::ProjectId;
use crate::recycle_bin::{
    domain::{EntityType, NewRecycleBinEntry, TaskSnapshot, UNASSIGNED_OWNER, UNKNOWN_USER},
    ports::{RecycleBinRepository, RecycleBinRepositoryError},
};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::{
    domain::UserId,
    ports::{UserDirectory, UserDirectoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors that abort a deletion plan.
#[derive(Debug, Error)]
pub enum TaskDeletionError {
    /// The task, or a task in its subtree, is completed.
    #[error("task {0} is completed and cannot be deleted")]
    CompletedTaskImmutable(TaskId),
    /// Stored parent links loop back onto a task already visited.
    #[error("task hierarchy contains a cycle through task {0}")]
    HierarchyCycle(TaskId),
    /// The snapshot could not be serialized.
    #[error("failed to serialize snapshot of task {task_id}: {source}")]
    Snapshot {
        /// Task being archived.
        task_id: TaskId,
        /// Serializer error.
        #[source]
        source: serde_json::Error,
    },
    /// Task repository operation failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
    /// Recycle-bin repository operation failed.
    #[error(transparent)]
    RecycleBin(#[from] RecycleBinRepositoryError),
    /// User directory lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),
}

/// Archive writes computed for one delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlan {
    root_id: TaskId,
    project_id: ProjectId,
    entries: Vec<NewRecycleBinEntry>,
}

impl DeletionPlan {
    /// Returns the task the request targeted.
    #[must_use]
    pub const fn root_id(&self) -> TaskId {
        self.root_id
    }

    /// Returns the project whose status must be recomputed afterwards.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the entries, every descendant ahead of its ancestors.
    #[must_use]
    pub fn entries(&self) -> &[NewRecycleBinEntry] {
        &self.entries
    }

    /// Returns the identifiers of the tasks the plan archives, in order.
    #[must_use]
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.entries
            .iter()
            .map(|entry| TaskId::new(entry.entity_id()))
            .collect()
    }

    /// Returns the number of tasks archived.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the plan archives nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

enum Visit {
    Enter(Task),
    Archive(Task),
}

/// Plans recursive soft deletion of a task subtree.
#[derive(Clone)]
pub struct TaskDeletionEngine<T, B, D, C>
where
    T: TaskRepository,
    B: RecycleBinRepository,
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    recycle_bin: Arc<B>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<T, B, D, C> TaskDeletionEngine<T, B, D, C>
where
    T: TaskRepository,
    B: RecycleBinRepository,
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates an engine over the given stores.
    #[must_use]
    pub const fn new(tasks: Arc<T>, recycle_bin: Arc<B>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            recycle_bin,
            directory,
            clock,
        }
    }

    /// Computes one archive entry per task in the subtree rooted at `root`.
    ///
    /// The walk is depth-first and every child is validated and archived
    /// before its parent. Descendants already in the recycle bin are left
    /// out together with their own subtrees. All entries share `deleted_by`
    /// and a single deletion timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDeletionError::CompletedTaskImmutable`] when any task in
    /// the subtree is completed, [`TaskDeletionError::HierarchyCycle`] when
    /// stored parent links form a loop, or the underlying lookup error.
    pub async fn plan(&self, root: Task, deleted_by: UserId) -> Result<DeletionPlan, TaskDeletionError> {
        let root_id = root.id();
        let project_id = root.project_id();
        let deleted_at = self.clock.utc();
        let archived = self.recycle_bin.archived_ids(EntityType::Task).await?;

        let mut visited = HashSet::new();
        let mut entries = Vec::new();
        let mut stack = vec![Visit::Enter(root)];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(task) => {
                    if task.is_completed() {
                        return Err(TaskDeletionError::CompletedTaskImmutable(task.id()));
                    }
                    if !visited.insert(task.id()) {
                        return Err(TaskDeletionError::HierarchyCycle(task.id()));
                    }
                    let children = self.tasks.find_children(task.id()).await?;
                    stack.push(Visit::Archive(task));
                    // Reversed so the oldest child is visited first.
                    stack.extend(
                        children
                            .into_iter()
                            .rev()
                            .filter(|child| !archived.contains(&child.id().value()))
                            .map(Visit::Enter),
                    );
                }
                Visit::Archive(task) => {
                    entries.push(self.archive_entry(&task, deleted_by, deleted_at).await?);
                }
            }
        }

        Ok(DeletionPlan {
            root_id,
            project_id,
            entries,
        })
    }

    async fn archive_entry(
        &self,
        task: &Task,
        deleted_by: UserId,
        deleted_at: DateTime<Utc>,
    ) -> Result<NewRecycleBinEntry, TaskDeletionError> {
        let owner = self.owner_name(task).await?;
        let snapshot = TaskSnapshot::capture(task, owner)
            .to_value()
            .map_err(|source| TaskDeletionError::Snapshot {
                task_id: task.id(),
                source,
            })?;
        debug!(task_id = %task.id(), "task archived into deletion plan");
        Ok(NewRecycleBinEntry::for_task(
            task.id(),
            snapshot,
            deleted_by,
            deleted_at,
        ))
    }

    async fn owner_name(&self, task: &Task) -> Result<String, TaskDeletionError> {
        let Some(owner_id) = task.first_assignee() else {
            return Ok(UNASSIGNED_OWNER.to_owned());
        };
        let owner = self.directory.find_user(owner_id).await?;
        Ok(owner.map_or_else(
            || UNKNOWN_USER.to_owned(),
            |user| user.display_name().to_owned(),
        ))
    }
}
