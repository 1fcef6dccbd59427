//! Shared embedded `PostgreSQL` cluster and per-test scratch databases.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use pg_embedded_setup_unpriv::{ClusterHandle, TestCluster};
use std::sync::OnceLock;
use uuid::Uuid;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Schema applied once to the template database.
const SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-03-01-000000_create_lab_tables/up.sql");

/// Template database holding the migrated schema.
const TEMPLATE_DB: &str = "labtrack_test_template";

static SHARED_CLUSTER: OnceLock<Option<ClusterHandle>> = OnceLock::new();

/// Returns the shared cluster, or `None` when it cannot start on this host.
pub fn shared_cluster() -> Option<&'static ClusterHandle> {
    SHARED_CLUSTER
        .get_or_init(|| match TestCluster::new_split() {
            Ok((cluster, guard)) => {
                std::mem::forget(guard);
                Some(cluster)
            }
            Err(err) => {
                eprintln!("SKIP-TEST-CLUSTER: failed to start PostgreSQL: {err}");
                None
            }
        })
        .as_ref()
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &ClusterHandle) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(SCHEMA_SQL)
                .map_err(|e| eyre::eyre!("schema migration failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Database cloned from the template and dropped with the guard.
pub struct TemporaryDatabase {
    cluster: &'static ClusterHandle,
    name: String,
}

impl TemporaryDatabase {
    /// Creates a uniquely named database from the template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template or the database cannot be created.
    pub fn create(cluster: &'static ClusterHandle, prefix: &str) -> Result<Self, BoxError> {
        ensure_template(cluster)?;
        let name = format!("{prefix}_{}", Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), TEMPLATE_DB)
            .map_err(|e| Box::new(e) as BoxError)?;
        Ok(Self { cluster, name })
    }

    /// Returns the connection URL of the database.
    #[must_use]
    pub fn url(&self) -> String {
        self.cluster.connection().database_url(&self.name)
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.name);
        }
    }
}
