//! Application services for task lifecycle orchestration.

mod deletion;
mod lifecycle;

pub use deletion::{DeletionPlan, TaskDeletionEngine, TaskDeletionError};
pub use lifecycle::{CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService};
