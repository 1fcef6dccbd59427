//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use crate::project::domain::ProjectId;
use thiserror::Error;

/// Errors returned while constructing or mutating tasks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The progress value exceeds 100 percent.
    #[error("invalid progress {0}, expected 0..=100")]
    InvalidProgress(u8),

    /// The requested status change is not allowed.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Task being transitioned.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// Sub-tasks cannot themselves carry sub-tasks.
    #[error("task {0} is a sub-task and cannot own sub-tasks")]
    NestedSubtask(TaskId),

    /// A sub-task must live in its parent's project.
    #[error("parent task {parent_id} belongs to project {parent_project}, not {project_id}")]
    CrossProjectSubtask {
        /// Intended parent.
        parent_id: TaskId,
        /// Project of the parent.
        parent_project: ProjectId,
        /// Project of the new sub-task.
        project_id: ProjectId,
    },
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
