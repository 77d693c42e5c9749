//! Project lookup implementations for the Projects domain

pub mod in_memory;
pub mod projects;

use heritage_common::Result;
use uuid::Uuid;

use crate::domain::entities::Project;

pub use in_memory::InMemoryProjectStore;
pub use projects::ProjectRepository;

/// Project-existence lookup consumed by the artifact pipeline
#[async_trait::async_trait]
pub trait ProjectLookup: Send + Sync {
    /// Find a project by ID; `Ok(None)` when it does not exist
    async fn find(&self, id: Uuid) -> Result<Option<Project>>;

    /// Whether a project with this ID exists
    async fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.find(id).await?.is_some())
    }
}
