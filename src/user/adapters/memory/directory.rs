//! In-memory user directory for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::user::{
    domain::{Role, User, UserId},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};

/// Thread-safe in-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    state: Arc<RwLock<InMemoryDirectoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryDirectoryState {
    users: HashMap<UserId, User>,
    last_id: i64,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user and assigns the next identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::InvalidPersistedData`] when the display
    /// name is blank, or a persistence error when the lock is poisoned.
    pub fn register(
        &self,
        display_name: impl Into<String>,
        role: Role,
    ) -> UserDirectoryResult<User> {
        let mut state = self.state.write().map_err(|err| {
            UserDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let id = UserId::new(state.last_id + 1);
        let user =
            User::new(id, display_name, role).map_err(UserDirectoryError::invalid_persisted_data)?;
        state.last_id = id.value();
        state.users.insert(id, user.clone());
        Ok(user)
    }

    /// Removes a user, mimicking an account deleted upstream.
    ///
    /// Returns `true` when the user existed.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn remove(&self, id: UserId) -> UserDirectoryResult<bool> {
        let mut state = self.state.write().map_err(|err| {
            UserDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.users.remove(&id).is_some())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        let state = self.state.read().map_err(|err| {
            UserDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.users.get(&id).cloned())
    }
}
