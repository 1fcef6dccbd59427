//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use labtrack::{
    project::{
        adapters::memory::InMemoryProjectRepository,
        domain::{NewProject, Project, ProjectStatus},
        ports::ProjectRepository,
    },
    recycle_bin::{adapters::memory::InMemoryRecycleBin, services::RecycleBinService},
    task::{
        adapters::memory::InMemoryTaskRepository,
        domain::{Task, TaskId},
        services::{CreateTaskRequest, TaskLifecycleService},
    },
    user::{
        adapters::memory::InMemoryUserDirectory,
        domain::{Actor, Role},
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Task service wired to in-memory adapters.
pub type Tasks = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryRecycleBin,
    InMemoryProjectRepository,
    InMemoryUserDirectory,
    DefaultClock,
>;

/// Recycle-bin service wired to in-memory adapters.
pub type Bin = RecycleBinService<
    InMemoryTaskRepository,
    InMemoryRecycleBin,
    InMemoryProjectRepository,
    InMemoryUserDirectory,
    DefaultClock,
>;

/// A project with one mentor and one intern, plus services over shared stores.
pub struct Lab {
    pub tasks: Tasks,
    pub bin: Bin,
    pub projects: Arc<InMemoryProjectRepository>,
    pub mentor: Actor,
    pub intern: Actor,
    pub project: Project,
}

impl Lab {
    /// Creates a top-level task as the mentor.
    ///
    /// # Errors
    ///
    /// Returns an error if task creation fails.
    pub async fn root(&self, title: &str) -> eyre::Result<Task> {
        let request = CreateTaskRequest::new(self.project.id(), title);
        Ok(self.tasks.create_task(self.mentor, request).await?)
    }

    /// Creates a sub-task of `parent` as the mentor.
    ///
    /// # Errors
    ///
    /// Returns an error if task creation fails.
    pub async fn subtask(&self, parent: TaskId, title: &str) -> eyre::Result<Task> {
        let request = CreateTaskRequest::new(self.project.id(), title).with_parent(parent);
        Ok(self.tasks.create_task(self.mentor, request).await?)
    }

    /// Returns the stored project status.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be read.
    pub async fn project_status(&self) -> eyre::Result<ProjectStatus> {
        let project = self
            .projects
            .find_by_id(self.project.id())
            .await?
            .ok_or_else(|| eyre::eyre!("project {} missing", self.project.id()))?;
        Ok(project.status())
    }
}

/// Provides a fresh lab with empty task and recycle-bin stores.
#[fixture]
pub async fn lab() -> Lab {
    if let Err(err) = labtrack::telemetry::init_tracing() {
        tracing::debug!(%err, "reusing installed subscriber");
    }
    let task_store = Arc::new(InMemoryTaskRepository::new());
    let recycle_store = Arc::new(InMemoryRecycleBin::new());
    let projects = Arc::new(InMemoryProjectRepository::new());
    let directory = Arc::new(InMemoryUserDirectory::new());
    let clock = Arc::new(DefaultClock);

    let mentor = directory
        .register("Dr. Minh", Role::Mentor)
        .expect("mentor registration should succeed");
    let intern = directory
        .register("Thu", Role::Intern)
        .expect("intern registration should succeed");
    let project = projects
        .insert(&NewProject::new("Soil sensors", mentor.id(), &*clock).expect("valid project"))
        .await
        .expect("project insert should succeed");

    let tasks = TaskLifecycleService::new(
        Arc::clone(&task_store),
        Arc::clone(&recycle_store),
        Arc::clone(&projects),
        Arc::clone(&directory),
        Arc::clone(&clock),
    );
    let bin = RecycleBinService::new(
        task_store,
        recycle_store,
        Arc::clone(&projects),
        directory,
        clock,
    );

    Lab {
        tasks,
        bin,
        projects,
        mentor: Actor::from(&mentor),
        intern: Actor::from(&intern),
        project,
    }
}
