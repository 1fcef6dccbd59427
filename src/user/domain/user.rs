//! User records as seen by the lab management core.

use super::{ParseRoleError, UserDomainError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role held by a user of the lab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Supervises projects and owns their task boards.
    Mentor,
    /// Works on tasks assigned by a mentor.
    Intern,
    /// Administers the installation.
    Admin,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mentor => "Mentor",
            Self::Intern => "Intern",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "mentor" => Ok(Self::Mentor),
            "intern" => Ok(Self::Intern),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// A resolved user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    display_name: String,
    role: Role,
}

impl User {
    /// Creates a user record.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyDisplayName`] when the name is blank.
    pub fn new(
        id: UserId,
        display_name: impl Into<String>,
        role: Role,
    ) -> Result<Self, UserDomainError> {
        let raw = display_name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyDisplayName);
        }
        Ok(Self {
            id,
            display_name: trimmed.to_owned(),
            role,
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}
