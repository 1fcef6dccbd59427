//! Error types for recycle-bin domain parsing.

use thiserror::Error;

/// Error returned while parsing entity type tags from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown entity type: {0}")]
pub struct ParseEntityTypeError(pub String);
