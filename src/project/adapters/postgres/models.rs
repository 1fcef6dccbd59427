//! Diesel row models for project persistence.

use super::schema::{project_members, projects};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owning mentor.
    pub mentor_id: i64,
    /// Status name.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for project records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    /// Project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owning mentor.
    pub mentor_id: i64,
    /// Status name.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for project membership.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = project_members)]
pub struct ProjectMemberRow {
    /// Project reference.
    pub project_id: i64,
    /// Member user reference.
    pub user_id: i64,
    /// Join order within the project.
    pub position: i32,
}
