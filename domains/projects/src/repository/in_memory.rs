//! In-memory project store
//!
//! Backs local development when no database is configured, and the
//! integration tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use heritage_common::{RepositoryError, Result};
use uuid::Uuid;

use crate::domain::entities::Project;
use crate::repository::ProjectLookup;

#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectStore {
    projects: Arc<RwLock<HashMap<Uuid, Project>>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a project, returning its ID
    pub fn insert(&self, project: Project) -> Result<Uuid> {
        let id = project.id;
        self.projects
            .write()
            .map_err(|_| RepositoryError::Poisoned)?
            .insert(id, project);
        Ok(id)
    }

    /// Remove a project, returning whether it was present
    pub fn remove(&self, id: Uuid) -> Result<bool> {
        let removed = self
            .projects
            .write()
            .map_err(|_| RepositoryError::Poisoned)?
            .remove(&id);
        Ok(removed.is_some())
    }
}

#[async_trait::async_trait]
impl ProjectLookup for InMemoryProjectStore {
    async fn find(&self, id: Uuid) -> Result<Option<Project>> {
        let projects = self.projects.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(projects.get(&id).cloned())
    }
}
