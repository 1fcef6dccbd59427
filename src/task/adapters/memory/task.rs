//! In-memory repository for tasks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::domain::ProjectId;
use crate::task::{
    domain::{NewTask, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    last_id: i64,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Collects tasks matching `predicate`, ordered by creation then id.
fn collect_sorted(state: &InMemoryTaskState, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
    let mut found: Vec<Task> = state
        .tasks
        .values()
        .filter(|task| predicate(task))
        .cloned()
        .collect();
    found.sort_by_key(|task| (task.created_at(), task.id()));
    found
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if let Some(parent_id) = task.parent_id()
            && !state.tasks.contains_key(&parent_id)
        {
            return Err(TaskRepositoryError::NotFound(parent_id));
        }

        let id = TaskId::new(state.last_id + 1);
        let stored = task.clone().into_task(id);
        state.last_id = id.value();
        state.tasks.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let slot = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_children(&self, parent_id: TaskId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(collect_sorted(&state, |task| {
            task.parent_id() == Some(parent_id)
        }))
    }

    async fn list_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(collect_sorted(&state, |task| task.project_id() == project_id))
    }

    async fn delete(&self, id: TaskId, purged_at: DateTime<Utc>) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let removed = state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;

        for task in state.tasks.values_mut() {
            if task.parent_id() == Some(id) {
                task.detach_from_parent(purged_at);
            }
        }

        if let Some(parent_id) = removed.parent_id() {
            let has_siblings = state
                .tasks
                .values()
                .any(|task| task.parent_id() == Some(parent_id));
            if !has_siblings && let Some(parent) = state.tasks.get_mut(&parent_id) {
                parent.clear_parent_flag(purged_at);
            }
        }
        Ok(())
    }
}
