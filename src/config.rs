//! Storage configuration read from the process environment.
//!
//! Only the `PostgreSQL` adapters need configuration; the in-memory
//! adapters are constructed directly.

use crate::postgres::PgPool;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::env;
use thiserror::Error;

/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Environment variable holding the maximum pool size.
pub const POOL_SIZE_VAR: &str = "LABTRACK_DB_POOL_SIZE";

/// Pool size used when [`POOL_SIZE_VAR`] is unset.
pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Errors raised while loading configuration or building the pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but its value is unusable.
    #[error("invalid value '{value}' for {name}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Rejected raw value.
        value: String,
    },

    /// The connection pool could not be created.
    #[error("failed to build connection pool: {0}")]
    Pool(#[source] PoolError),
}

/// Connection settings for the `PostgreSQL` adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    database_url: String,
    pool_size: u32,
}

impl StoreConfig {
    /// Creates a configuration with the default pool size.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    /// Overrides the maximum number of pooled connections.
    #[must_use]
    pub const fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `DATABASE_URL` is unset and
    /// [`ConfigError::Invalid`] when the pool size is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`StoreConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;

        let pool_size = match lookup(POOL_SIZE_VAR) {
            None => DEFAULT_POOL_SIZE,
            Some(raw) => parse_pool_size(&raw)?,
        };

        Ok(Self {
            database_url,
            pool_size,
        })
    }

    /// Returns the connection URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum pool size.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }

    /// Builds the r2d2 pool used by every `PostgreSQL` adapter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the pool cannot establish its
    /// initial connections.
    pub fn build_pool(&self) -> Result<PgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(self.database_url.as_str());
        Pool::builder()
            .max_size(self.pool_size)
            .build(manager)
            .map_err(ConfigError::Pool)
    }
}

fn parse_pool_size(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| ConfigError::Invalid {
            name: POOL_SIZE_VAR,
            value: raw.to_owned(),
        })
}
