//! Diesel row models for user records.

use super::schema::users;
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Display name.
    pub display_name: String,
    /// Role name.
    pub role: String,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Display name.
    pub display_name: String,
    /// Role name.
    pub role: String,
}
