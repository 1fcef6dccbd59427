//! In-memory recycle bin.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::recycle_bin::{
    domain::{EntityType, NewRecycleBinEntry, RecycleBinEntry, RecycleId},
    ports::{RecycleBinRepository, RecycleBinRepositoryError, RecycleBinRepositoryResult},
};

/// Thread-safe in-memory recycle bin.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecycleBin {
    state: Arc<RwLock<InMemoryRecycleBinState>>,
}

#[derive(Debug, Default)]
struct InMemoryRecycleBinState {
    entries: HashMap<RecycleId, RecycleBinEntry>,
    entity_index: HashMap<(EntityType, i64), RecycleId>,
    last_id: i64,
}

impl InMemoryRecycleBin {
    /// Creates an empty recycle bin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecycleBinRepository for InMemoryRecycleBin {
    async fn archive_all(
        &self,
        entries: &[NewRecycleBinEntry],
    ) -> RecycleBinRepositoryResult<Vec<RecycleBinEntry>> {
        let mut state = self.state.write().map_err(|err| {
            RecycleBinRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        // Validate the whole batch before touching state.
        let mut batch_keys = HashSet::with_capacity(entries.len());
        for entry in entries {
            let key = (entry.entity_type(), entry.entity_id());
            if state.entity_index.contains_key(&key) || !batch_keys.insert(key) {
                return Err(RecycleBinRepositoryError::DuplicateEntry {
                    entity_type: entry.entity_type(),
                    entity_id: entry.entity_id(),
                });
            }
        }

        let mut stored = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = RecycleId::new(state.last_id + 1);
            state.last_id = id.value();
            let live = entry.clone().into_entry(id);
            state
                .entity_index
                .insert((live.entity_type(), live.entity_id()), id);
            state.entries.insert(id, live.clone());
            stored.push(live);
        }
        Ok(stored)
    }

    async fn find_by_id(&self, id: RecycleId) -> RecycleBinRepositoryResult<Option<RecycleBinEntry>> {
        let state = self.state.read().map_err(|err| {
            RecycleBinRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.entries.get(&id).cloned())
    }

    async fn find_by_entity(
        &self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> RecycleBinRepositoryResult<Option<RecycleBinEntry>> {
        let state = self.state.read().map_err(|err| {
            RecycleBinRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .entity_index
            .get(&(entity_type, entity_id))
            .and_then(|id| state.entries.get(id))
            .cloned())
    }

    async fn list_by_type(
        &self,
        entity_type: EntityType,
    ) -> RecycleBinRepositoryResult<Vec<RecycleBinEntry>> {
        let state = self.state.read().map_err(|err| {
            RecycleBinRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .entries
            .values()
            .filter(|entry| entry.entity_type() == entity_type)
            .cloned()
            .collect())
    }

    async fn archived_ids(&self, entity_type: EntityType) -> RecycleBinRepositoryResult<HashSet<i64>> {
        let state = self.state.read().map_err(|err| {
            RecycleBinRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .entity_index
            .keys()
            .filter(|(kind, _)| *kind == entity_type)
            .map(|(_, entity_id)| *entity_id)
            .collect())
    }

    async fn remove(&self, id: RecycleId) -> RecycleBinRepositoryResult<RecycleBinEntry> {
        let mut state = self.state.write().map_err(|err| {
            RecycleBinRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let removed = state
            .entries
            .remove(&id)
            .ok_or(RecycleBinRepositoryError::NotFound(id))?;
        state
            .entity_index
            .remove(&(removed.entity_type(), removed.entity_id()));
        Ok(removed)
    }
}
