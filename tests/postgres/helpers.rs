//! Lab fixture wired to the `PostgreSQL` adapters.

use super::cluster::{TemporaryDatabase, shared_cluster};
use labtrack::{
    config::StoreConfig,
    project::{
        adapters::postgres::PostgresProjectRepository,
        domain::{NewProject, Project},
        ports::ProjectRepository,
    },
    recycle_bin::{adapters::postgres::PostgresRecycleBin, services::RecycleBinService},
    task::{
        adapters::postgres::PostgresTaskRepository,
        domain::{Task, TaskId},
        services::{CreateTaskRequest, TaskLifecycleService},
    },
    user::{
        adapters::postgres::PostgresUserDirectory,
        domain::{Actor, Role},
    },
};
use eyre::Result;
use mockable::DefaultClock;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Task service wired to `PostgreSQL` adapters.
pub type Tasks = TaskLifecycleService<
    PostgresTaskRepository,
    PostgresRecycleBin,
    PostgresProjectRepository,
    PostgresUserDirectory,
    DefaultClock,
>;

/// Recycle-bin service wired to `PostgreSQL` adapters.
pub type Bin = RecycleBinService<
    PostgresTaskRepository,
    PostgresRecycleBin,
    PostgresProjectRepository,
    PostgresUserDirectory,
    DefaultClock,
>;

/// A project with one mentor in its own scratch database.
pub struct PgLab {
    pub rt: Runtime,
    pub tasks: Tasks,
    pub bin: Bin,
    pub task_store: Arc<PostgresTaskRepository>,
    pub recycle_store: Arc<PostgresRecycleBin>,
    pub mentor: Actor,
    pub project: Project,
    _database: TemporaryDatabase,
}

impl PgLab {
    /// Creates a lab in a fresh database, or `None` when no cluster is
    /// available.
    ///
    /// # Errors
    ///
    /// Returns an error if database, pool, or seed data setup fails.
    pub fn open(prefix: &str) -> Result<Option<Self>> {
        let Some(cluster) = shared_cluster() else {
            return Ok(None);
        };
        let database =
            TemporaryDatabase::create(cluster, prefix).map_err(|err| eyre::eyre!(err))?;
        let pool = StoreConfig::new(database.url())
            .with_pool_size(2)
            .build_pool()?;
        let rt = test_runtime()?;

        let task_store = Arc::new(PostgresTaskRepository::new(pool.clone()));
        let recycle_store = Arc::new(PostgresRecycleBin::new(pool.clone()));
        let projects = Arc::new(PostgresProjectRepository::new(pool.clone()));
        let directory = Arc::new(PostgresUserDirectory::new(pool));
        let clock = Arc::new(DefaultClock);

        let (mentor, project) = rt.block_on(async {
            let mentor = directory.register("Dr. Minh", Role::Mentor).await?;
            let new_project = NewProject::new("Soil sampling", mentor.id(), &DefaultClock)?;
            let project = projects.insert(&new_project).await?;
            Ok::<_, eyre::Report>((mentor, project))
        })?;

        let tasks = TaskLifecycleService::new(
            Arc::clone(&task_store),
            Arc::clone(&recycle_store),
            Arc::clone(&projects),
            Arc::clone(&directory),
            Arc::clone(&clock),
        );
        let bin = RecycleBinService::new(
            Arc::clone(&task_store),
            Arc::clone(&recycle_store),
            projects,
            directory,
            clock,
        );
        Ok(Some(Self {
            rt,
            tasks,
            bin,
            task_store,
            recycle_store,
            mentor: Actor::from(&mentor),
            project,
            _database: database,
        }))
    }

    /// Creates a task as the mentor, optionally under a parent.
    ///
    /// # Errors
    ///
    /// Returns an error if task creation fails.
    pub fn create(&self, title: &str, parent: Option<TaskId>) -> Result<Task> {
        let mut request = CreateTaskRequest::new(self.project.id(), title);
        if let Some(id) = parent {
            request = request.with_parent(id);
        }
        Ok(self
            .rt
            .block_on(self.tasks.create_task(self.mentor, request))?)
    }
}

/// Creates a current-thread runtime for driving the async services.
fn test_runtime() -> Result<Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
