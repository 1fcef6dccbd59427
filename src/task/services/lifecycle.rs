//! Service layer for task creation, assignment, status flow, and deletion.

use super::deletion::{TaskDeletionEngine, TaskDeletionError};
use crate::project::{
    domain::ProjectId,
    ports::{ProjectRepository, ProjectRepositoryError},
    services::{ProjectStatusAggregator, ProjectStatusError},
};
use crate::recycle_bin::{
    domain::{EntityType, RecycleBinEntry},
    ports::{RecycleBinRepository, RecycleBinRepositoryError},
};
use crate::task::{
    domain::{NewTask, ProgressPercent, Task, TaskDomainError, TaskId, TaskPriority, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::{
    domain::{AccessDenied, Actor, Permission, Role, UserId},
    ports::{UserDirectory, UserDirectoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for creating a task or sub-task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    priority: Option<TaskPriority>,
    deadline: Option<DateTime<Utc>>,
    parent_id: Option<TaskId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
            priority: None,
            deadline: None,
            parent_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Creates the task as a sub-task of `parent_id`.
    #[must_use]
    pub const fn with_parent(mut self, parent_id: TaskId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The acting user may not perform the operation.
    #[error(transparent)]
    Unauthorized(#[from] AccessDenied),
    /// The task does not exist or is in the recycle bin.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    /// The task, or a task in its subtree, is completed.
    #[error("task {0} is completed and cannot be deleted")]
    CompletedTaskImmutable(TaskId),
    /// Stored parent links form a loop.
    #[error("task hierarchy contains a cycle through task {0}")]
    HierarchyCycle(TaskId),
    /// A snapshot could not be serialized.
    #[error("failed to serialize snapshot of task {task_id}: {source}")]
    Snapshot {
        /// Task being archived.
        task_id: TaskId,
        /// Serializer error.
        #[source]
        source: serde_json::Error,
    },
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Recycle-bin repository operation failed.
    #[error(transparent)]
    RecycleBin(#[from] RecycleBinRepositoryError),
    /// Project repository operation failed.
    #[error(transparent)]
    Project(#[from] ProjectRepositoryError),
    /// User directory lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),
    /// Project status recomputation failed.
    #[error(transparent)]
    ProjectStatus(#[from] ProjectStatusError),
}

impl From<TaskDeletionError> for TaskLifecycleError {
    fn from(err: TaskDeletionError) -> Self {
        match err {
            TaskDeletionError::CompletedTaskImmutable(id) => Self::CompletedTaskImmutable(id),
            TaskDeletionError::HierarchyCycle(id) => Self::HierarchyCycle(id),
            TaskDeletionError::Snapshot { task_id, source } => Self::Snapshot { task_id, source },
            TaskDeletionError::Task(inner) => Self::Repository(inner),
            TaskDeletionError::RecycleBin(inner) => Self::RecycleBin(inner),
            TaskDeletionError::Directory(inner) => Self::Directory(inner),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<T, B, P, D, C>
where
    T: TaskRepository,
    B: RecycleBinRepository,
    P: ProjectRepository,
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    recycle_bin: Arc<B>,
    projects: Arc<P>,
    clock: Arc<C>,
    deletion: TaskDeletionEngine<T, B, D, C>,
    aggregator: ProjectStatusAggregator<T, B, P, C>,
}

impl<T, B, P, D, C> TaskLifecycleService<T, B, P, D, C>
where
    T: TaskRepository,
    B: RecycleBinRepository,
    P: ProjectRepository,
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(
        tasks: Arc<T>,
        recycle_bin: Arc<B>,
        projects: Arc<P>,
        directory: Arc<D>,
        clock: Arc<C>,
    ) -> Self {
        let deletion = TaskDeletionEngine::new(
            Arc::clone(&tasks),
            Arc::clone(&recycle_bin),
            directory,
            Arc::clone(&clock),
        );
        let aggregator = ProjectStatusAggregator::new(
            Arc::clone(&tasks),
            Arc::clone(&recycle_bin),
            Arc::clone(&projects),
            Arc::clone(&clock),
        );
        Self {
            tasks,
            recycle_bin,
            projects,
            clock,
            deletion,
            aggregator,
        }
    }

    /// Creates a task, or a sub-task when the request names a parent.
    ///
    /// Attaching a sub-task flags its parent. The project's status is
    /// recomputed afterwards, so a completed project reopens.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the actor lacks permission, the
    /// project or parent is missing, the hierarchy rule is violated, or
    /// persistence fails.
    pub async fn create_task(
        &self,
        actor: Actor,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        actor.authorize(Permission::ManageTasks)?;
        let CreateTaskRequest {
            project_id,
            title,
            description,
            priority,
            deadline,
            parent_id,
        } = request;

        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(TaskLifecycleError::ProjectNotFound(project_id));
        }

        let mut new_task = NewTask::new(project_id, title, actor.user_id(), &*self.clock)?;
        if let Some(text) = description {
            new_task = new_task.with_description(text);
        }
        if let Some(level) = priority {
            new_task = new_task.with_priority(level);
        }
        if let Some(due) = deadline {
            new_task = new_task.with_deadline(due);
        }

        let parent = match parent_id {
            Some(id) => {
                let parent = self.load_active(id).await?;
                new_task = new_task.as_subtask_of(&parent)?;
                Some(parent)
            }
            None => None,
        };

        let task = self.tasks.insert(&new_task).await?;
        if let Some(mut owner) = parent {
            owner.mark_as_parent(&*self.clock)?;
            self.tasks.update(&owner).await?;
        }

        self.aggregator.recompute(project_id).await?;
        info!(task_id = %task.id(), %project_id, parent = ?parent_id, "task created");
        Ok(task)
    }

    /// Assigns a user to an active task. Re-assigning is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the actor lacks permission, the
    /// task is missing or deleted, or persistence fails.
    pub async fn assign_task(
        &self,
        actor: Actor,
        task_id: TaskId,
        user_id: UserId,
    ) -> TaskLifecycleResult<Task> {
        actor.authorize(Permission::ManageTasks)?;
        let mut task = self.load_active(task_id).await?;
        if task.assign(user_id, &*self.clock) {
            self.tasks.update(&task).await?;
            info!(%task_id, assignee = %user_id, "task assigned");
        }
        Ok(task)
    }

    /// Moves an active task along the status flow.
    ///
    /// Interns may only move tasks assigned to them.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the actor lacks permission, the
    /// task is missing or deleted, the transition is invalid, or persistence
    /// fails.
    pub async fn update_status(
        &self,
        actor: Actor,
        task_id: TaskId,
        target: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        actor.authorize(Permission::UpdateTaskStatus)?;
        let mut task = self.load_active(task_id).await?;
        ensure_assigned_if_intern(actor, &task, Permission::UpdateTaskStatus)?;

        let previous = task.status();
        task.transition_to(target, &*self.clock)?;
        self.tasks.update(&task).await?;
        self.aggregator.recompute(task.project_id()).await?;
        info!(%task_id, from = %previous, to = %target, "task status changed");
        Ok(task)
    }

    /// Records progress on an active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the actor lacks permission, the
    /// percentage is out of range, the task is missing or deleted, or
    /// persistence fails.
    pub async fn report_progress(
        &self,
        actor: Actor,
        task_id: TaskId,
        percent: u8,
    ) -> TaskLifecycleResult<Task> {
        actor.authorize(Permission::UpdateTaskStatus)?;
        let progress = ProgressPercent::new(percent)?;
        let mut task = self.load_active(task_id).await?;
        ensure_assigned_if_intern(actor, &task, Permission::UpdateTaskStatus)?;
        task.report_progress(progress, &*self.clock);
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Returns the active tasks of a project, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when a repository lookup fails.
    pub async fn list_active_tasks(&self, project_id: ProjectId) -> TaskLifecycleResult<Vec<Task>> {
        let archived = self.recycle_bin.archived_ids(EntityType::Task).await?;
        let tasks = self.tasks.list_by_project(project_id).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| !archived.contains(&task.id().value()))
            .collect())
    }

    /// Finds a task if it exists and is not in the recycle bin.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when a repository lookup fails.
    pub async fn find_active_task(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        match self.load_active(task_id).await {
            Ok(task) => Ok(Some(task)),
            Err(TaskLifecycleError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Soft-deletes a task and its whole subtree into the recycle bin.
    ///
    /// One entry is written per deleted task, all in a single atomic batch,
    /// and the project's status is recomputed once afterwards. Returns the
    /// stored entries, descendants before ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is missing or
    /// already deleted, [`TaskLifecycleError::CompletedTaskImmutable`] when
    /// any task in the subtree is completed (nothing is written), or
    /// [`TaskLifecycleError::Unauthorized`] when the actor lacks permission.
    pub async fn delete_task(
        &self,
        actor: Actor,
        task_id: TaskId,
    ) -> TaskLifecycleResult<Vec<RecycleBinEntry>> {
        if let Err(denied) = actor.authorize(Permission::ManageTasks) {
            warn!(%task_id, user = %actor.user_id(), "task deletion denied");
            return Err(denied.into());
        }
        let task = self.load_active(task_id).await?;

        let plan = match self.deletion.plan(task, actor.user_id()).await {
            Ok(plan) => plan,
            Err(err) => {
                warn!(%task_id, error = %err, "task deletion rejected");
                return Err(err.into());
            }
        };

        let stored = self.recycle_bin.archive_all(plan.entries()).await?;
        self.aggregator.recompute(plan.project_id()).await?;
        info!(
            %task_id,
            project_id = %plan.project_id(),
            archived = stored.len(),
            by = %actor.user_id(),
            "task subtree moved to recycle bin"
        );
        Ok(stored)
    }

    async fn load_active(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))?;
        let archived = self
            .recycle_bin
            .find_by_entity(EntityType::Task, task_id.value())
            .await?;
        if archived.is_some() {
            return Err(TaskLifecycleError::NotFound(task_id));
        }
        Ok(task)
    }
}

fn ensure_assigned_if_intern(
    actor: Actor,
    task: &Task,
    permission: Permission,
) -> Result<(), AccessDenied> {
    if actor.role() == Role::Intern && !task.assignees().contains(&actor.user_id()) {
        return Err(AccessDenied {
            user_id: actor.user_id(),
            role: actor.role(),
            permission,
        });
    }
    Ok(())
}
