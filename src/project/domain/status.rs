//! Project status and its derivation from task state.

use super::ParseProjectStatusError;
use crate::task::domain::TaskStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// At least one live task is unfinished.
    InProgress,
    /// Every live task is completed.
    Completed,
    /// Abandoned by an explicit decision. Never derived.
    Dropped,
}

impl ProjectStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Dropped => "Dropped",
        }
    }

    /// Derives the status implied by the statuses of a project's live tasks.
    ///
    /// `Dropped` is sticky, and an empty task set leaves `self` unchanged
    /// because there is nothing to infer from.
    #[must_use]
    pub fn derive<I>(self, live_task_statuses: I) -> Self
    where
        I: IntoIterator<Item = TaskStatus>,
    {
        if self == Self::Dropped {
            return self;
        }

        let mut saw_task = false;
        for status in live_task_statuses {
            saw_task = true;
            if status != TaskStatus::Completed {
                return Self::InProgress;
            }
        }

        if saw_task { Self::Completed } else { self }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', ' '], "");
        match normalized.as_str() {
            "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "dropped" => Ok(Self::Dropped),
            _ => Err(ParseProjectStatusError(value.to_owned())),
        }
    }
}
