//! Projects domain: heritage projects, primary assets, project lookup

pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{PrimaryAsset, Project};

// Re-export repository types
pub use repository::{InMemoryProjectStore, ProjectLookup, ProjectRepository};
