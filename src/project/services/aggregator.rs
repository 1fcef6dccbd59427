//! Recomputes a project's status from its live task set.

use crate::project::{
    domain::{ProjectId, ProjectStatus},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::recycle_bin::{
    domain::EntityType,
    ports::{RecycleBinRepository, RecycleBinRepositoryError},
};
use crate::task::{
    domain::Task,
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while recomputing a project's status.
#[derive(Debug, Error)]
pub enum ProjectStatusError {
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    /// Project repository operation failed.
    #[error(transparent)]
    Project(#[from] ProjectRepositoryError),
    /// Task repository operation failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
    /// Recycle-bin repository operation failed.
    #[error(transparent)]
    RecycleBin(#[from] RecycleBinRepositoryError),
}

/// Result type for project status recomputation.
pub type ProjectStatusResult<T> = Result<T, ProjectStatusError>;

/// Sole writer of derived project statuses.
///
/// Services call [`ProjectStatusAggregator::recompute`] once after each
/// structural task mutation.
#[derive(Clone)]
pub struct ProjectStatusAggregator<T, B, P, C>
where
    T: TaskRepository,
    B: RecycleBinRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    recycle_bin: Arc<B>,
    projects: Arc<P>,
    clock: Arc<C>,
}

impl<T, B, P, C> ProjectStatusAggregator<T, B, P, C>
where
    T: TaskRepository,
    B: RecycleBinRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates an aggregator over the given stores.
    #[must_use]
    pub const fn new(tasks: Arc<T>, recycle_bin: Arc<B>, projects: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            recycle_bin,
            projects,
            clock,
        }
    }

    /// Recomputes and persists the status of `project_id`.
    ///
    /// Dropped projects and projects without live tasks keep their status.
    /// Returns the status after recomputation.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStatusError::ProjectNotFound`] for unknown projects,
    /// or the underlying repository error.
    pub async fn recompute(&self, project_id: ProjectId) -> ProjectStatusResult<ProjectStatus> {
        let mut project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(ProjectStatusError::ProjectNotFound(project_id))?;
        let previous = project.status();
        if previous == ProjectStatus::Dropped {
            debug!(%project_id, "project is dropped; status left unchanged");
            return Ok(previous);
        }

        let archived = self.recycle_bin.archived_ids(EntityType::Task).await?;
        let tasks = self.tasks.list_by_project(project_id).await?;
        let derived = previous.derive(
            tasks
                .iter()
                .filter(|task| !archived.contains(&task.id().value()))
                .map(Task::status),
        );

        if project.apply_derived_status(derived, &*self.clock) {
            self.projects.update(&project).await?;
            info!(%project_id, from = %previous, to = %derived, "project status changed");
        }
        Ok(project.status())
    }
}
