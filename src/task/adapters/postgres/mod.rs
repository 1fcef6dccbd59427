//! `PostgreSQL` adapters for task persistence.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresTaskRepository;
