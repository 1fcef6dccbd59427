//! Domain model for users, roles, and acting-user permissions.

mod actor;
mod error;
mod ids;
mod user;

pub use actor::{AccessDenied, Actor, Permission};
pub use error::{ParseRoleError, UserDomainError};
pub use ids::UserId;
pub use user::{Role, User};
