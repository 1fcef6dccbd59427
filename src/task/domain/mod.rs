//! Domain model for tasks.

mod error;
mod ids;
mod status;
mod task;

pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use status::{TaskPriority, TaskStatus};
pub use task::{NewTask, PersistedTaskData, ProgressPercent, Task};
