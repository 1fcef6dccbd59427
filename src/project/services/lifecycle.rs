//! Project creation, membership, and dropping.

use crate::project::{
    domain::{NewProject, Project, ProjectDomainError, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::user::domain::{AccessDenied, Actor, Permission, UserId};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// The acting user may not perform the operation.
    #[error(transparent)]
    Unauthorized(#[from] AccessDenied),
    /// The project does not exist.
    #[error("project not found: {0}")]
    NotFound(ProjectId),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project orchestration service.
#[derive(Clone)]
pub struct ProjectService<P, C>
where
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    clock: Arc<C>,
}

impl<P, C> ProjectService<P, C>
where
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(projects: Arc<P>, clock: Arc<C>) -> Self {
        Self { projects, clock }
    }

    /// Creates a project owned by the acting mentor.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError`] when the actor lacks permission, the
    /// name is blank, or persistence fails.
    pub async fn create_project(
        &self,
        actor: Actor,
        name: impl Into<String> + Send,
        description: Option<String>,
    ) -> ProjectServiceResult<Project> {
        actor.authorize(Permission::ManageProjects)?;
        let mut new_project = NewProject::new(name, actor.user_id(), &*self.clock)?;
        if let Some(text) = description {
            new_project = new_project.with_description(text);
        }
        let project = self.projects.insert(&new_project).await?;
        info!(project_id = %project.id(), mentor = %actor.user_id(), "project created");
        Ok(project)
    }

    /// Adds an intern to a project. Adding an existing member is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError`] when the actor lacks permission, the
    /// project does not exist, or persistence fails.
    pub async fn add_member(
        &self,
        actor: Actor,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectServiceResult<Project> {
        actor.authorize(Permission::ManageProjects)?;
        let mut project = self.load(project_id).await?;
        if project.add_member(user_id, &*self.clock) {
            self.projects.update(&project).await?;
        }
        Ok(project)
    }

    /// Marks a project as dropped. This is the only way to reach `Dropped`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError`] when the actor lacks permission, the
    /// project does not exist or is already dropped, or persistence fails.
    pub async fn drop_project(
        &self,
        actor: Actor,
        project_id: ProjectId,
    ) -> ProjectServiceResult<Project> {
        actor.authorize(Permission::ManageProjects)?;
        let mut project = self.load(project_id).await?;
        project.drop_project(&*self.clock)?;
        self.projects.update(&project).await?;
        info!(%project_id, by = %actor.user_id(), "project dropped");
        Ok(project)
    }

    /// Retrieves a project.
    ///
    /// Returns `Ok(None)` when the project does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when lookup fails.
    pub async fn find_project(&self, project_id: ProjectId) -> ProjectServiceResult<Option<Project>> {
        Ok(self.projects.find_by_id(project_id).await?)
    }

    async fn load(&self, project_id: ProjectId) -> ProjectServiceResult<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or(ProjectServiceError::NotFound(project_id))
    }
}
