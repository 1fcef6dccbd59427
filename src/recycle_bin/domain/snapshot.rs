//! Point-in-time task snapshots stored as opaque JSON.
//!
//! The key set is fixed: `TaskId`, `TaskName`, `CreatedAt`, `Deadline`,
//! `Owner`, `Status`, `ProjectId`. Existing stored snapshots use exactly
//! these names, so readers must tolerate missing or mistyped fields.

use crate::project::domain::ProjectId;
use crate::task::domain::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Owner shown for tasks without assignees.
pub const UNASSIGNED_OWNER: &str = "Unassigned";

/// Name shown when a user id no longer resolves.
pub const UNKNOWN_USER: &str = "Unknown";

/// Task name shown when a snapshot lacks one.
pub const UNKNOWN_TASK_NAME: &str = "(Unknown Task)";

/// Status shown when a snapshot lacks one.
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Display-relevant task fields captured at deletion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskSnapshot {
    /// Deleted task's identifier.
    pub task_id: i64,
    /// Title at deletion time.
    pub task_name: String,
    /// Creation timestamp of the task.
    pub created_at: DateTime<Utc>,
    /// Deadline, if one was set.
    pub deadline: Option<DateTime<Utc>>,
    /// Display name of the first assignee.
    pub owner: String,
    /// Status string at deletion time.
    pub status: String,
    /// Owning project identifier.
    pub project_id: i64,
}

impl TaskSnapshot {
    /// Copies the snapshot fields out of `task`.
    #[must_use]
    pub fn capture(task: &Task, owner: impl Into<String>) -> Self {
        Self {
            task_id: task.id().value(),
            task_name: task.title().to_owned(),
            created_at: task.created_at(),
            deadline: task.deadline(),
            owner: owner.into(),
            status: task.status().as_str().to_owned(),
            project_id: task.project_id().value(),
        }
    }

    /// Serializes the snapshot into its stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which cannot occur for this shape in
    /// practice but is propagated rather than unwrapped.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Listing fields read leniently from a stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    /// Task name or [`UNKNOWN_TASK_NAME`].
    pub name: String,
    /// Owner or [`UNASSIGNED_OWNER`].
    pub owner: String,
    /// Status or [`UNKNOWN_STATUS`].
    pub status: String,
    /// Project reference, when present.
    pub project_id: Option<ProjectId>,
}

impl SnapshotSummary {
    /// Extracts listing fields, substituting fallbacks for missing values.
    #[must_use]
    pub fn from_snapshot(snapshot: &Value) -> Self {
        let text = |key: &str, fallback: &str| {
            snapshot
                .get(key)
                .and_then(Value::as_str)
                .filter(|value| !value.trim().is_empty())
                .map_or_else(|| fallback.to_owned(), str::to_owned)
        };
        Self {
            name: text("TaskName", UNKNOWN_TASK_NAME),
            owner: text("Owner", UNASSIGNED_OWNER),
            status: text("Status", UNKNOWN_STATUS),
            project_id: snapshot
                .get("ProjectId")
                .and_then(Value::as_i64)
                .map(ProjectId::new),
        }
    }
}
