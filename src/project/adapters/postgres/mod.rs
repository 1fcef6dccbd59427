//! `PostgreSQL` adapter for project persistence.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresProjectRepository;
