//! Shared world state for recycle-bin BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use labtrack::{
    project::{
        adapters::memory::InMemoryProjectRepository, domain::ProjectId, services::ProjectService,
    },
    recycle_bin::{
        adapters::memory::InMemoryRecycleBin,
        domain::{RecycleBinEntry, RecycleId},
        services::{RecycleBinService, RecycleBinServiceResult},
    },
    task::{
        adapters::memory::InMemoryTaskRepository,
        domain::Task,
        services::{TaskLifecycleResult, TaskLifecycleService},
    },
    user::{adapters::memory::InMemoryUserDirectory, domain::Actor},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Task service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryRecycleBin,
    InMemoryProjectRepository,
    InMemoryUserDirectory,
    DefaultClock,
>;

/// Recycle-bin service type used by the BDD world.
pub type TestBinService = RecycleBinService<
    InMemoryTaskRepository,
    InMemoryRecycleBin,
    InMemoryProjectRepository,
    InMemoryUserDirectory,
    DefaultClock,
>;

/// Scenario world for recycle-bin behaviour tests.
pub struct RecycleBinWorld {
    pub directory: Arc<InMemoryUserDirectory>,
    pub projects: ProjectService<InMemoryProjectRepository, DefaultClock>,
    pub tasks: TestTaskService,
    pub bin: TestBinService,
    pub mentor: Option<Actor>,
    pub intern: Option<Actor>,
    pub project_id: Option<ProjectId>,
    pub known_tasks: HashMap<String, Task>,
    pub entries: HashMap<String, RecycleId>,
    pub last_delete: Option<TaskLifecycleResult<Vec<RecycleBinEntry>>>,
    pub last_bin_result: Option<RecycleBinServiceResult<RecycleBinEntry>>,
}

impl RecycleBinWorld {
    /// Creates a world with empty stores.
    #[must_use]
    pub fn new() -> Self {
        let task_store = Arc::new(InMemoryTaskRepository::new());
        let recycle_store = Arc::new(InMemoryRecycleBin::new());
        let project_store = Arc::new(InMemoryProjectRepository::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let clock = Arc::new(DefaultClock);

        let tasks = TaskLifecycleService::new(
            Arc::clone(&task_store),
            Arc::clone(&recycle_store),
            Arc::clone(&project_store),
            Arc::clone(&directory),
            Arc::clone(&clock),
        );
        let bin = RecycleBinService::new(
            task_store,
            recycle_store,
            Arc::clone(&project_store),
            Arc::clone(&directory),
            Arc::clone(&clock),
        );

        Self {
            directory,
            projects: ProjectService::new(project_store, clock),
            tasks,
            bin,
            mentor: None,
            intern: None,
            project_id: None,
            known_tasks: HashMap::new(),
            entries: HashMap::new(),
            last_delete: None,
            last_bin_result: None,
        }
    }

    /// Returns the scenario's mentor.
    ///
    /// # Errors
    ///
    /// Returns an error if the background step has not run.
    pub fn mentor(&self) -> Result<Actor, eyre::Report> {
        self.mentor
            .ok_or_else(|| eyre::eyre!("missing mentor in scenario world"))
    }

    /// Returns the scenario's intern.
    ///
    /// # Errors
    ///
    /// Returns an error if the background step has not run.
    pub fn intern(&self) -> Result<Actor, eyre::Report> {
        self.intern
            .ok_or_else(|| eyre::eyre!("missing intern in scenario world"))
    }

    /// Returns the scenario's project.
    ///
    /// # Errors
    ///
    /// Returns an error if the background step has not run.
    pub fn project_id(&self) -> Result<ProjectId, eyre::Report> {
        self.project_id
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Looks up a task created earlier in the scenario by title.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has the title.
    pub fn task(&self, title: &str) -> Result<&Task, eyre::Report> {
        self.known_tasks
            .get(title)
            .ok_or_else(|| eyre::eyre!("unknown task {title:?} in scenario world"))
    }

    /// Looks up the recycle-bin entry created for a task title.
    ///
    /// # Errors
    ///
    /// Returns an error if the task has not been deleted in this scenario.
    pub fn entry(&self, title: &str) -> Result<RecycleId, eyre::Report> {
        self.entries
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no recycle bin entry for {title:?}"))
    }

    /// Records the entries of a successful delete by task name.
    pub fn remember_entries(&mut self, stored: &[RecycleBinEntry]) {
        for entry in stored {
            self.entries.insert(entry.summary().name, entry.id());
        }
    }
}

impl Default for RecycleBinWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RecycleBinWorld {
    RecycleBinWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
