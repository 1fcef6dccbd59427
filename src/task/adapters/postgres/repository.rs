//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskAssigneeRow, TaskChangeset, TaskRow},
    schema::{task_assignees, tasks},
};
use crate::postgres::{PgPool, get_conn_with, run_blocking_with};
use crate::project::domain::ProjectId;
use crate::task::{
    domain::{
        NewTask, PersistedTaskData, ProgressPercent, Task, TaskId, TaskPriority, TaskStatus,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use std::collections::HashMap;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, TaskRepositoryError::persistence)?;
                f(&mut connection)
            },
            TaskRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let new_row = to_new_row(task);
        self.run(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                if let Some(parent_id) = new_row.parent_id {
                    let parent_exists: i64 = tasks::table
                        .filter(tasks::id.eq(parent_id))
                        .count()
                        .get_result(tx)?;
                    if parent_exists == 0 {
                        return Err(TaskRepositoryError::NotFound(TaskId::new(parent_id)));
                    }
                }
                let row = diesel::insert_into(tasks::table)
                    .values(&new_row)
                    .returning(TaskRow::as_returning())
                    .get_result::<TaskRow>(tx)?;
                row_to_task(row, Vec::new())
            })
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let id = task.id();
        let changeset = to_changeset(task);
        let assignees = assignee_rows(id, task.assignees())?;

        self.run(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let updated = diesel::update(tasks::table.filter(tasks::id.eq(id.value())))
                    .set(&changeset)
                    .execute(tx)?;
                if updated == 0 {
                    return Err(TaskRepositoryError::NotFound(id));
                }
                diesel::delete(task_assignees::table.filter(task_assignees::task_id.eq(id.value())))
                    .execute(tx)?;
                if !assignees.is_empty() {
                    diesel::insert_into(task_assignees::table)
                        .values(&assignees)
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run(move |connection| {
            let rows = tasks::table
                .filter(tasks::id.eq(id.value()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            Ok(hydrate(connection, rows)?.into_iter().next())
        })
        .await
    }

    async fn find_children(&self, parent_id: TaskId) -> TaskRepositoryResult<Vec<Task>> {
        self.run(move |connection| {
            let rows = tasks::table
                .filter(tasks::parent_id.eq(parent_id.value()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            hydrate(connection, rows)
        })
        .await
    }

    async fn list_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        self.run(move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project_id.value()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            hydrate(connection, rows)
        })
        .await
    }

    async fn delete(&self, id: TaskId, purged_at: DateTime<Utc>) -> TaskRepositoryResult<()> {
        self.run(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let parent_id = tasks::table
                    .filter(tasks::id.eq(id.value()))
                    .select(tasks::parent_id)
                    .first::<Option<i64>>(tx)
                    .optional()?
                    .ok_or(TaskRepositoryError::NotFound(id))?;

                diesel::update(tasks::table.filter(tasks::parent_id.eq(id.value())))
                    .set((
                        tasks::parent_id.eq(None::<i64>),
                        tasks::updated_at.eq(purged_at),
                    ))
                    .execute(tx)?;
                diesel::delete(task_assignees::table.filter(task_assignees::task_id.eq(id.value())))
                    .execute(tx)?;
                diesel::delete(tasks::table.filter(tasks::id.eq(id.value()))).execute(tx)?;

                if let Some(parent) = parent_id {
                    let remaining: i64 = tasks::table
                        .filter(tasks::parent_id.eq(parent))
                        .count()
                        .get_result(tx)?;
                    if remaining == 0 {
                        diesel::update(tasks::table.filter(tasks::id.eq(parent)))
                            .set((
                                tasks::is_parent.eq(false),
                                tasks::updated_at.eq(purged_at),
                            ))
                            .execute(tx)?;
                    }
                }
                Ok(())
            })
        })
        .await
    }
}

/// Loads assignees for `rows` in one query and converts them to tasks.
fn hydrate(connection: &mut PgConnection, rows: Vec<TaskRow>) -> TaskRepositoryResult<Vec<Task>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let assignee_rows = task_assignees::table
        .filter(task_assignees::task_id.eq_any(ids))
        .order((task_assignees::task_id.asc(), task_assignees::position.asc()))
        .select(TaskAssigneeRow::as_select())
        .load::<TaskAssigneeRow>(connection)?;

    let mut by_task: HashMap<i64, Vec<i64>> = HashMap::new();
    for assignee in assignee_rows {
        by_task
            .entry(assignee.task_id)
            .or_default()
            .push(assignee.user_id);
    }

    rows.into_iter()
        .map(|row| {
            let assignees = by_task.remove(&row.id).unwrap_or_default();
            row_to_task(row, assignees)
        })
        .collect()
}

fn to_new_row(task: &NewTask) -> NewTaskRow {
    NewTaskRow {
        project_id: task.project_id().value(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        priority: task.priority().map(|priority| priority.as_str().to_owned()),
        status: TaskStatus::ToDo.as_str().to_owned(),
        deadline: task.deadline(),
        parent_id: task.parent_id().map(TaskId::value),
        is_parent: false,
        created_by: task.created_by().value(),
        created_at: task.created_at(),
        updated_at: task.created_at(),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        priority: task.priority().map(|priority| priority.as_str().to_owned()),
        status: task.status().as_str().to_owned(),
        progress: task.progress().map(|progress| i16::from(progress.value())),
        deadline: task.deadline(),
        parent_id: task.parent_id().map(TaskId::value),
        is_parent: task.is_parent(),
        updated_at: task.updated_at(),
    }
}

fn assignee_rows(task_id: TaskId, assignees: &[UserId]) -> TaskRepositoryResult<Vec<TaskAssigneeRow>> {
    assignees
        .iter()
        .enumerate()
        .map(|(index, user_id)| {
            let position = i32::try_from(index).map_err(TaskRepositoryError::persistence)?;
            Ok(TaskAssigneeRow {
                task_id: task_id.value(),
                user_id: user_id.value(),
                position,
            })
        })
        .collect()
}

fn row_to_task(row: TaskRow, assignees: Vec<i64>) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        title,
        description,
        priority: persisted_priority,
        status: persisted_status,
        progress: persisted_progress,
        deadline,
        parent_id,
        is_parent,
        created_by,
        created_at,
        updated_at,
    } = row;

    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let priority = persisted_priority
        .as_deref()
        .map(TaskPriority::try_from)
        .transpose()
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let progress = persisted_progress
        .map(|value| {
            let percent = u8::try_from(value).map_err(TaskRepositoryError::invalid_persisted_data)?;
            ProgressPercent::new(percent).map_err(TaskRepositoryError::invalid_persisted_data)
        })
        .transpose()?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(id),
        project_id: ProjectId::new(project_id),
        title,
        description,
        priority,
        status,
        progress,
        deadline,
        parent_id: parent_id.map(TaskId::new),
        is_parent,
        assignees: assignees.into_iter().map(UserId::new).collect(),
        created_by: UserId::new(created_by),
        created_at,
        updated_at,
    }))
}
