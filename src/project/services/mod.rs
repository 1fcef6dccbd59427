//! Application services for projects.

mod aggregator;
mod lifecycle;

pub use aggregator::{ProjectStatusAggregator, ProjectStatusError, ProjectStatusResult};
pub use lifecycle::{ProjectService, ProjectServiceError, ProjectServiceResult};
