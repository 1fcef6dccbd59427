//! Domain model for projects.

mod error;
mod ids;
mod project;
mod status;

pub use error::{ParseProjectStatusError, ProjectDomainError};
pub use ids::ProjectId;
pub use project::{NewProject, PersistedProjectData, Project};
pub use status::ProjectStatus;
