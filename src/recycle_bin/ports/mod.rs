//! Port contracts for recycle-bin persistence.

pub mod repository;

pub use repository::{RecycleBinRepository, RecycleBinRepositoryError, RecycleBinRepositoryResult};
