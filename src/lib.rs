//! Labtrack: task lifecycle and recycle bin for lab project management.
//!
//! Mentors organise projects into tasks and sub-tasks, interns move their
//! assigned tasks through `ToDo`, `Doing`, and `Completed`. Deleting a task
//! soft-deletes its whole subtree into a recycle bin from which entries can
//! be restored or purged. Every structural change recomputes the owning
//! project's status.
//!
//! # Architecture
//!
//! Labtrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and user lookup
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration over ports, taking an explicit acting user
//!
//! # Modules
//!
//! - [`task`]: Task hierarchy, status flow, and recursive deletion
//! - [`recycle_bin`]: Snapshots of deleted entities, restore, and purge
//! - [`project`]: Projects and their derived status
//! - [`user`]: User directory and role-based permissions
//! - [`config`]: Environment configuration and pool construction
//! - [`telemetry`]: Optional `tracing` subscriber installation

pub mod config;
pub mod postgres;
pub mod project;
pub mod recycle_bin;
pub mod task;
pub mod telemetry;
pub mod user;
