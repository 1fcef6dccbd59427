//! Acting user passed explicitly into service operations.

use super::{Role, User, UserId};
use std::fmt;
use thiserror::Error;

/// Operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Create projects, add members, drop projects.
    ManageProjects,
    /// Create, assign, and delete tasks.
    ManageTasks,
    /// Restore or permanently purge recycle-bin entries.
    ManageRecycleBin,
    /// Move a task through its status flow.
    UpdateTaskStatus,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ManageProjects => "manage projects",
            Self::ManageTasks => "manage tasks",
            Self::ManageRecycleBin => "manage the recycle bin",
            Self::UpdateTaskStatus => "update task status",
        };
        f.write_str(label)
    }
}

/// Returned when the acting user's role does not grant a permission.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("user {user_id} with role {role} may not {permission}")]
pub struct AccessDenied {
    /// Acting user.
    pub user_id: UserId,
    /// Role the user acted with.
    pub role: Role,
    /// Permission that was required.
    pub permission: Permission,
}

/// The user on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Actor {
    user_id: UserId,
    role: Role,
}

impl Actor {
    /// Creates an actor from an id and role supplied by the session layer.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Returns the acting user's identifier.
    #[must_use]
    pub const fn user_id(self) -> UserId {
        self.user_id
    }

    /// Returns the acting user's role.
    #[must_use]
    pub const fn role(self) -> Role {
        self.role
    }

    /// Reports whether the role grants `permission`.
    #[must_use]
    pub const fn can(self, permission: Permission) -> bool {
        match self.role {
            Role::Mentor | Role::Admin => true,
            Role::Intern => matches!(permission, Permission::UpdateTaskStatus),
        }
    }

    /// Fails with [`AccessDenied`] unless the role grants `permission`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] when the permission is not granted.
    pub const fn authorize(self, permission: Permission) -> Result<(), AccessDenied> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(AccessDenied {
                user_id: self.user_id,
                role: self.role,
                permission,
            })
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id(), user.role())
    }
}
