//! Task aggregate root.

use super::{TaskDomainError, TaskId, TaskPriority, TaskStatus};
use crate::project::domain::ProjectId;
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Completion percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressPercent(u8);

impl ProgressPercent {
    /// Fully complete.
    pub const COMPLETE: Self = Self(100);

    /// Creates a validated progress value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidProgress`] above 100.
    pub const fn new(value: u8) -> Result<Self, TaskDomainError> {
        if value > 100 {
            return Err(TaskDomainError::InvalidProgress(value));
        }
        Ok(Self(value))
    }

    /// Returns the percentage.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    priority: Option<TaskPriority>,
    status: TaskStatus,
    progress: Option<ProgressPercent>,
    deadline: Option<DateTime<Utc>>,
    parent_id: Option<TaskId>,
    is_parent: bool,
    assignees: Vec<UserId>,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional priority.
    pub priority: Option<TaskPriority>,
    /// Board status.
    pub status: TaskStatus,
    /// Optional progress.
    pub progress: Option<ProgressPercent>,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Parent task, for sub-tasks.
    pub parent_id: Option<TaskId>,
    /// Whether the task owns sub-tasks.
    pub is_parent: bool,
    /// Assigned users in assignment order.
    pub assignees: Vec<UserId>,
    /// Creating user.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A task that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    priority: Option<TaskPriority>,
    deadline: Option<DateTime<Utc>>,
    parent_id: Option<TaskId>,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Validates the title and stamps the creation time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            project_id,
            title: trimmed.to_owned(),
            description: None,
            priority: None,
            deadline: None,
            parent_id: None,
            created_by,
            created_at: clock.utc(),
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Makes this task a sub-task of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NestedSubtask`] when `parent` is itself a
    /// sub-task, and [`TaskDomainError::CrossProjectSubtask`] when it belongs
    /// to another project.
    pub fn as_subtask_of(mut self, parent: &Task) -> Result<Self, TaskDomainError> {
        if parent.parent_id.is_some() {
            return Err(TaskDomainError::NestedSubtask(parent.id));
        }
        if parent.project_id != self.project_id {
            return Err(TaskDomainError::CrossProjectSubtask {
                parent_id: parent.id,
                parent_project: parent.project_id,
                project_id: self.project_id,
            });
        }
        self.parent_id = Some(parent.id);
        Ok(self)
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the validated title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the priority, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the parent task, if this is a sub-task.
    #[must_use]
    pub const fn parent_id(&self) -> Option<TaskId> {
        self.parent_id
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Materializes the task once storage has assigned an identifier.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: TaskStatus::ToDo,
            progress: None,
            deadline: self.deadline,
            parent_id: self.parent_id,
            is_parent: false,
            assignees: Vec::new(),
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            progress: data.progress,
            deadline: data.deadline,
            parent_id: data.parent_id,
            is_parent: data.is_parent,
            assignees: data.assignees,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the priority, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the board status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the progress, if reported.
    #[must_use]
    pub const fn progress(&self) -> Option<ProgressPercent> {
        self.progress
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the parent task, if this is a sub-task.
    #[must_use]
    pub const fn parent_id(&self) -> Option<TaskId> {
        self.parent_id
    }

    /// Returns whether the task owns sub-tasks.
    #[must_use]
    pub const fn is_parent(&self) -> bool {
        self.is_parent
    }

    /// Returns the assigned users in assignment order.
    #[must_use]
    pub fn assignees(&self) -> &[UserId] {
        &self.assignees
    }

    /// Returns the first assigned user, who is shown as the task owner.
    #[must_use]
    pub fn first_assignee(&self) -> Option<UserId> {
        self.assignees.first().copied()
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Moves the task along the status flow.
    ///
    /// Completing a task pins its progress to 100 percent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the flow
    /// does not allow the move.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        if target == TaskStatus::Completed {
            self.progress = Some(ProgressPercent::COMPLETE);
        }
        self.touch(clock);
        Ok(())
    }

    /// Records reported progress.
    pub fn report_progress(&mut self, progress: ProgressPercent, clock: &impl Clock) {
        self.progress = Some(progress);
        self.touch(clock);
    }

    /// Appends an assignee. Returns `false` if already assigned.
    pub fn assign(&mut self, user_id: UserId, clock: &impl Clock) -> bool {
        if self.assignees.contains(&user_id) {
            return false;
        }
        self.assignees.push(user_id);
        self.touch(clock);
        true
    }

    /// Flags the task as owning sub-tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NestedSubtask`] when the task is itself a
    /// sub-task.
    pub fn mark_as_parent(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.parent_id.is_some() {
            return Err(TaskDomainError::NestedSubtask(self.id));
        }
        if !self.is_parent {
            self.is_parent = true;
            self.touch(clock);
        }
        Ok(())
    }

    /// Clears the parent flag once the last sub-task is purged.
    pub const fn clear_parent_flag(&mut self, purged_at: DateTime<Utc>) {
        self.is_parent = false;
        self.updated_at = purged_at;
    }

    /// Detaches a sub-task whose parent was purged.
    pub const fn detach_from_parent(&mut self, purged_at: DateTime<Utc>) {
        self.parent_id = None;
        self.updated_at = purged_at;
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
