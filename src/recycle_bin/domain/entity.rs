//! Entity type tags stored on recycle-bin entries.

use super::ParseEntityTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity a recycle-bin entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// A project task.
    Task,
}

impl EntityType {
    /// Returns the tag persisted with each entry.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "Task",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for EntityType {
    type Error = ParseEntityTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task),
            _ => Err(ParseEntityTypeError(value.to_owned())),
        }
    }
}
