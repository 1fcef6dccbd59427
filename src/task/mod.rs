//! Task lifecycle management.
//!
//! Tasks form a two-level hierarchy (parents and their sub-tasks) within a
//! project. Deleting a task soft-deletes its whole subtree into the recycle
//! bin; a task is active exactly while no live recycle-bin entry references
//! it. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
