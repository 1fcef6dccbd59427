//! `PostgreSQL` repository implementation for projects.

use super::{
    models::{NewProjectRow, ProjectMemberRow, ProjectRow},
    schema::{project_members, projects},
};
use crate::postgres::{PgPool, get_conn_with, run_blocking_with};
use crate::project::{
    domain::{NewProject, PersistedProjectData, Project, ProjectId, ProjectStatus},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, ProjectRepositoryError::persistence)?;
                f(&mut connection)
            },
            ProjectRepositoryError::persistence,
        )
        .await
    }
}

impl From<DieselError> for ProjectRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn insert(&self, project: &NewProject) -> ProjectRepositoryResult<Project> {
        let new_row = NewProjectRow {
            name: project.name().to_owned(),
            description: project.description().map(str::to_owned),
            mentor_id: project.mentor_id().value(),
            status: ProjectStatus::InProgress.as_str().to_owned(),
            created_at: project.created_at(),
            updated_at: project.created_at(),
        };
        self.run(move |connection| {
            let row = diesel::insert_into(projects::table)
                .values(&new_row)
                .returning(ProjectRow::as_returning())
                .get_result::<ProjectRow>(connection)?;
            row_to_project(row, Vec::new())
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let id = project.id();
        let name = project.name().to_owned();
        let description = project.description().map(str::to_owned);
        let status = project.status().as_str().to_owned();
        let updated_at = project.updated_at();
        let members = member_rows(id, project.members())?;

        self.run(move |connection| {
            connection.transaction::<_, ProjectRepositoryError, _>(|tx| {
                let updated = diesel::update(projects::table.filter(projects::id.eq(id.value())))
                    .set((
                        projects::name.eq(name),
                        projects::description.eq(description),
                        projects::status.eq(status),
                        projects::updated_at.eq(updated_at),
                    ))
                    .execute(tx)?;
                if updated == 0 {
                    return Err(ProjectRepositoryError::NotFound(id));
                }
                diesel::delete(
                    project_members::table.filter(project_members::project_id.eq(id.value())),
                )
                .execute(tx)?;
                if !members.is_empty() {
                    diesel::insert_into(project_members::table)
                        .values(&members)
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.value()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            let Some(found) = row else {
                return Ok(None);
            };
            let members = project_members::table
                .filter(project_members::project_id.eq(id.value()))
                .order(project_members::position.asc())
                .select(project_members::user_id)
                .load::<i64>(connection)?;
            row_to_project(found, members).map(Some)
        })
        .await
    }
}

fn member_rows(
    project_id: ProjectId,
    members: &[UserId],
) -> ProjectRepositoryResult<Vec<ProjectMemberRow>> {
    members
        .iter()
        .enumerate()
        .map(|(index, user_id)| {
            let position = i32::try_from(index).map_err(ProjectRepositoryError::persistence)?;
            Ok(ProjectMemberRow {
                project_id: project_id.value(),
                user_id: user_id.value(),
                position,
            })
        })
        .collect()
}

fn row_to_project(row: ProjectRow, members: Vec<i64>) -> ProjectRepositoryResult<Project> {
    let status = ProjectStatus::try_from(row.status.as_str())
        .map_err(ProjectRepositoryError::invalid_persisted_data)?;
    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::new(row.id),
        name: row.name,
        description: row.description,
        mentor_id: UserId::new(row.mentor_id),
        members: members.into_iter().map(UserId::new).collect(),
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
