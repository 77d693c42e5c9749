//! Narrative generation API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use heritage_common::{LenientJson, Result};
use serde::Serialize;

use crate::api::middleware::ArtifactsState;
use crate::domain::entities::{DerivedArtifact, NarrativeOptions};

/// Successful generation response
#[derive(Debug, Serialize)]
pub struct ArtifactResponse {
    pub success: bool,
    pub artifact: DerivedArtifact,
}

impl From<DerivedArtifact> for ArtifactResponse {
    fn from(artifact: DerivedArtifact) -> Self {
        Self {
            success: true,
            artifact,
        }
    }
}

/// Generate a narrative for a project.
///
/// The options body is optional; a missing or malformed body runs the
/// generation with default options. The project ID is validated by the
/// orchestrator after the capability check.
pub async fn generate_narrative(
    State(state): State<ArtifactsState>,
    Path(project_id): Path<String>,
    options: LenientJson<NarrativeOptions>,
) -> Result<Json<ArtifactResponse>> {
    if options.is_fallback() {
        tracing::debug!(project_id = %project_id, "Narrative requested with default options");
    }

    let artifact = state
        .orchestrator
        .narrative(&state.capabilities, &project_id, options.into_inner())
        .await?;

    Ok(Json(DerivedArtifact::from(artifact).into()))
}
