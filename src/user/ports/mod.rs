//! Port contracts for resolving users.

pub mod directory;

pub use directory::{UserDirectory, UserDirectoryError, UserDirectoryResult};
