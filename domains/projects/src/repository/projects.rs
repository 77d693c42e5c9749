//! Project repository

use crate::domain::entities::Project;
use crate::repository::ProjectLookup;
use heritage_common::{RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// All columns in the projects table, used for SELECT clauses.
const PROJECT_COLUMNS: &str = "\
    id, name, description, location, \
    metadata, created_at, updated_at";

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProjectLookup for ProjectRepository {
    async fn find(&self, id: Uuid) -> Result<Option<Project>> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::Connection)?;

        tracing::debug!(project_id = %id, found = project.is_some(), "Project lookup");
        Ok(project)
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::Connection)?;

        Ok(exists)
    }
}
