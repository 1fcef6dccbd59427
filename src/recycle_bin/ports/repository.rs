//! Repository port for recycle-bin entries.

use crate::recycle_bin::domain::{EntityType, NewRecycleBinEntry, RecycleBinEntry, RecycleId};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for recycle-bin repository operations.
pub type RecycleBinRepositoryResult<T> = Result<T, RecycleBinRepositoryError>;

/// Recycle-bin persistence contract.
///
/// Every stored entry is live: restore and purge remove the row, so at most
/// one entry exists per `(entity type, entity id)`.
#[async_trait]
pub trait RecycleBinRepository: Send + Sync {
    /// Stores a batch of entries atomically, preserving batch order in the
    /// returned entries.
    ///
    /// # Errors
    ///
    /// Returns [`RecycleBinRepositoryError::DuplicateEntry`] without storing
    /// anything when any entity in the batch already has a live entry or
    /// appears twice in the batch.
    async fn archive_all(
        &self,
        entries: &[NewRecycleBinEntry],
    ) -> RecycleBinRepositoryResult<Vec<RecycleBinEntry>>;

    /// Finds an entry by identifier.
    async fn find_by_id(&self, id: RecycleId) -> RecycleBinRepositoryResult<Option<RecycleBinEntry>>;

    /// Finds the live entry for an entity, if it is deleted.
    async fn find_by_entity(
        &self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> RecycleBinRepositoryResult<Option<RecycleBinEntry>>;

    /// Returns all entries of a type in no particular order.
    async fn list_by_type(
        &self,
        entity_type: EntityType,
    ) -> RecycleBinRepositoryResult<Vec<RecycleBinEntry>>;

    /// Returns the identifiers of all deleted entities of a type.
    async fn archived_ids(&self, entity_type: EntityType) -> RecycleBinRepositoryResult<HashSet<i64>>;

    /// Removes an entry and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`RecycleBinRepositoryError::NotFound`] when no entry has the
    /// identifier.
    async fn remove(&self, id: RecycleId) -> RecycleBinRepositoryResult<RecycleBinEntry>;
}

/// Errors returned by recycle-bin repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RecycleBinRepositoryError {
    /// The entity already has a live entry.
    #[error("{entity_type} {entity_id} is already in the recycle bin")]
    DuplicateEntry {
        /// Entity type tag.
        entity_type: EntityType,
        /// Entity identifier.
        entity_id: i64,
    },

    /// The entry was not found.
    #[error("recycle-bin entry not found: {0}")]
    NotFound(RecycleId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RecycleBinRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
