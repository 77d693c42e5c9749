//! Domain entities for Projects domain
//!
//! A project is the unit a narrative is written about; a primary asset is
//! an uploaded file that derived artifacts are computed from. Both are
//! created by the ingest flow, outside this workspace.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use heritage_common::{Error, Result};

/// Heritage project entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub metadata: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project with validation
    pub fn new(name: String, description: Option<String>) -> Result<Self> {
        if name.trim().is_empty() || name.len() > 200 {
            return Err(Error::Validation(
                "Project name must be 1-200 characters".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Project {
            id: Uuid::new_v4(),
            name,
            description,
            location: None,
            metadata: Json(serde_json::Value::Object(serde_json::Map::new())),
            created_at: now,
            updated_at: now,
        })
    }

    /// Set the place the project documents
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Attach stored metadata (catalogue fields, dates, materials)
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Json(metadata);
        self
    }

    /// Whether any stored metadata is present
    pub fn has_metadata(&self) -> bool {
        match &self.metadata.0 {
            serde_json::Value::Null => false,
            serde_json::Value::Object(map) => !map.is_empty(),
            _ => true,
        }
    }
}

/// Uploaded original file a derived artifact is computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryAsset {
    pub project_id: Option<Uuid>,
    pub locator: PathBuf,
    pub content_type: String,
}

impl PrimaryAsset {
    /// Create a primary asset reference
    pub fn new(locator: impl Into<PathBuf>, content_type: impl Into<String>) -> Self {
        Self {
            project_id: None,
            locator: locator.into(),
            content_type: content_type.into(),
        }
    }

    /// Associate the asset with a project
    pub fn for_project(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Location of the stored original
    pub fn locator(&self) -> &Path {
        &self.locator
    }
}
