//! Domain model for recycle-bin entries and task snapshots.

mod entity;
mod entry;
mod error;
mod ids;
mod snapshot;

pub use entity::EntityType;
pub use entry::{NewRecycleBinEntry, PersistedRecycleBinEntryData, RecycleBinEntry};
pub use error::ParseEntityTypeError;
pub use ids::RecycleId;
pub use snapshot::{
    SnapshotSummary, TaskSnapshot, UNASSIGNED_OWNER, UNKNOWN_STATUS, UNKNOWN_TASK_NAME,
    UNKNOWN_USER,
};
