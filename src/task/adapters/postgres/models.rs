//! Diesel row models for task persistence.

use super::schema::{task_assignees, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional priority name.
    pub priority: Option<String>,
    /// Board status name.
    pub status: String,
    /// Optional progress percentage.
    pub progress: Option<i16>,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Parent task for sub-tasks.
    pub parent_id: Option<i64>,
    /// Whether the task owns sub-tasks.
    pub is_parent: bool,
    /// Creating user.
    pub created_by: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Owning project.
    pub project_id: i64,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional priority name.
    pub priority: Option<String>,
    /// Board status name.
    pub status: String,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Parent task for sub-tasks.
    pub parent_id: Option<i64>,
    /// Whether the task owns sub-tasks.
    pub is_parent: bool,
    /// Creating user.
    pub created_by: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when an existing task is updated.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional priority name.
    pub priority: Option<String>,
    /// Board status name.
    pub status: String,
    /// Optional progress percentage.
    pub progress: Option<i16>,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Parent task for sub-tasks.
    pub parent_id: Option<i64>,
    /// Whether the task owns sub-tasks.
    pub is_parent: bool,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row linking a user to a task.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_assignees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskAssigneeRow {
    /// Task reference.
    pub task_id: i64,
    /// Assigned user.
    pub user_id: i64,
    /// Assignment order.
    pub position: i32,
}
