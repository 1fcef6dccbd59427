//! `PostgreSQL` adapter for the user directory.

mod directory;
mod models;
pub(crate) mod schema;

pub use directory::PostgresUserDirectory;
