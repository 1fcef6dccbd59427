//! Project aggregate.

use super::{ProjectDomainError, ProjectId, ProjectStatus};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A project supervised by a mentor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: Option<String>,
    mentor_id: UserId,
    members: Vec<UserId>,
    status: ProjectStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted identifier.
    pub id: ProjectId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Owning mentor.
    pub mentor_id: UserId,
    /// Intern members in join order.
    pub members: Vec<UserId>,
    /// Persisted status.
    pub status: ProjectStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A project that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    name: String,
    description: Option<String>,
    mentor_id: UserId,
    created_at: DateTime<Utc>,
}

impl NewProject {
    /// Validates the name and stamps the creation time.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        mentor_id: UserId,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProjectDomainError::EmptyName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            description: None,
            mentor_id,
            created_at: clock.utc(),
        })
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the validated name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the owning mentor.
    #[must_use]
    pub const fn mentor_id(&self) -> UserId {
        self.mentor_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Materializes the project once storage has assigned an identifier.
    #[must_use]
    pub fn into_project(self, id: ProjectId) -> Project {
        Project {
            id,
            name: self.name,
            description: self.description,
            mentor_id: self.mentor_id,
            members: Vec::new(),
            status: ProjectStatus::InProgress,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

impl Project {
    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            mentor_id: data.mentor_id,
            members: data.members,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the owning mentor.
    #[must_use]
    pub const fn mentor_id(&self) -> UserId {
        self.mentor_id
    }

    /// Returns the intern members in join order.
    #[must_use]
    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
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

    /// Adds an intern to the project. Returns `false` if already a member.
    pub fn add_member(&mut self, user_id: UserId, clock: &impl Clock) -> bool {
        if self.members.contains(&user_id) {
            return false;
        }
        self.members.push(user_id);
        self.touch(clock);
        true
    }

    /// Marks the project as dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::AlreadyDropped`] when the project is
    /// already dropped.
    pub fn drop_project(&mut self, clock: &impl Clock) -> Result<(), ProjectDomainError> {
        if self.status == ProjectStatus::Dropped {
            return Err(ProjectDomainError::AlreadyDropped(self.id));
        }
        self.status = ProjectStatus::Dropped;
        self.touch(clock);
        Ok(())
    }

    /// Applies a derived status, leaving dropped projects untouched.
    ///
    /// Returns `true` when the stored status changed.
    pub fn apply_derived_status(&mut self, derived: ProjectStatus, clock: &impl Clock) -> bool {
        if self.status == ProjectStatus::Dropped
            || derived == ProjectStatus::Dropped
            || derived == self.status
        {
            return false;
        }
        self.status = derived;
        self.touch(clock);
        true
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
