//! `PostgreSQL` adapter for the recycle bin.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresRecycleBin;
