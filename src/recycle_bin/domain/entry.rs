//! Recycle-bin entries.

use super::{EntityType, RecycleId, SnapshotSummary};
use crate::task::domain::TaskId;
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// An entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecycleBinEntry {
    entity_type: EntityType,
    entity_id: i64,
    snapshot: Value,
    deleted_by: UserId,
    deleted_at: DateTime<Utc>,
}

impl NewRecycleBinEntry {
    /// Creates an entry marking a task as deleted.
    #[must_use]
    pub fn for_task(
        task_id: TaskId,
        snapshot: Value,
        deleted_by: UserId,
        deleted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            entity_type: EntityType::Task,
            entity_id: task_id.value(),
            snapshot,
            deleted_by,
            deleted_at,
        }
    }

    /// Returns the entity type tag.
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Returns the deleted entity's identifier.
    #[must_use]
    pub const fn entity_id(&self) -> i64 {
        self.entity_id
    }

    /// Returns the stored snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &Value {
        &self.snapshot
    }

    /// Returns the deleting user.
    #[must_use]
    pub const fn deleted_by(&self) -> UserId {
        self.deleted_by
    }

    /// Returns the deletion timestamp.
    #[must_use]
    pub const fn deleted_at(&self) -> DateTime<Utc> {
        self.deleted_at
    }

    /// Materializes the entry once storage has assigned an identifier.
    #[must_use]
    pub fn into_entry(self, id: RecycleId) -> RecycleBinEntry {
        RecycleBinEntry {
            id,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            snapshot: self.snapshot,
            deleted_by: self.deleted_by,
            deleted_at: self.deleted_at,
        }
    }
}

/// Parameter object for reconstructing a persisted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRecycleBinEntryData {
    /// Entry identifier.
    pub id: RecycleId,
    /// Entity type tag.
    pub entity_type: EntityType,
    /// Deleted entity's identifier.
    pub entity_id: i64,
    /// Stored snapshot.
    pub snapshot: Value,
    /// Deleting user.
    pub deleted_by: UserId,
    /// Deletion timestamp.
    pub deleted_at: DateTime<Utc>,
}

/// A live recycle-bin entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecycleBinEntry {
    id: RecycleId,
    entity_type: EntityType,
    entity_id: i64,
    snapshot: Value,
    deleted_by: UserId,
    deleted_at: DateTime<Utc>,
}

impl RecycleBinEntry {
    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRecycleBinEntryData) -> Self {
        Self {
            id: data.id,
            entity_type: data.entity_type,
            entity_id: data.entity_id,
            snapshot: data.snapshot,
            deleted_by: data.deleted_by,
            deleted_at: data.deleted_at,
        }
    }

    /// Returns the insert form of this entry, without its identifier.
    #[must_use]
    pub fn to_new_entry(&self) -> NewRecycleBinEntry {
        NewRecycleBinEntry {
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            snapshot: self.snapshot.clone(),
            deleted_by: self.deleted_by,
            deleted_at: self.deleted_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> RecycleId {
        self.id
    }

    /// Returns the entity type tag.
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Returns the deleted entity's identifier.
    #[must_use]
    pub const fn entity_id(&self) -> i64 {
        self.entity_id
    }

    /// Returns the deleted task's identifier for task entries.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        match self.entity_type {
            EntityType::Task => Some(TaskId::new(self.entity_id)),
        }
    }

    /// Returns the stored snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &Value {
        &self.snapshot
    }

    /// Returns listing fields read from the snapshot.
    #[must_use]
    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary::from_snapshot(&self.snapshot)
    }

    /// Returns the deleting user.
    #[must_use]
    pub const fn deleted_by(&self) -> UserId {
        self.deleted_by
    }

    /// Returns the deletion timestamp.
    #[must_use]
    pub const fn deleted_at(&self) -> DateTime<Utc> {
        self.deleted_at
    }
}
