//! Diesel row models for recycle-bin persistence.

use super::schema::recycle_bin;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for recycle-bin entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recycle_bin)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecycleBinRow {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Entity type tag.
    pub entity_type: String,
    /// Deleted entity's identifier.
    pub entity_id: i64,
    /// Snapshot JSON payload.
    pub snapshot: Value,
    /// Deleting user.
    pub deleted_by: i64,
    /// Deletion timestamp.
    pub deleted_at: DateTime<Utc>,
}

/// Insert model for recycle-bin entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recycle_bin)]
pub struct NewRecycleBinRow {
    /// Entity type tag.
    pub entity_type: String,
    /// Deleted entity's identifier.
    pub entity_id: i64,
    /// Snapshot JSON payload.
    pub snapshot: Value,
    /// Deleting user.
    pub deleted_by: i64,
    /// Deletion timestamp.
    pub deleted_at: DateTime<Utc>,
}
