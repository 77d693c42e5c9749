//! Route definitions for Artifacts domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{capabilities, narratives};
use super::middleware::ArtifactsState;

/// Create narrative routes
fn narrative_routes() -> Router<ArtifactsState> {
    Router::new().route(
        "/v1/projects/{project_id}/narrative",
        post(narratives::generate_narrative),
    )
}

/// Create capability routes
fn capability_routes() -> Router<ArtifactsState> {
    Router::new().route("/v1/capabilities", get(capabilities::get_capabilities))
}

/// Create all Artifacts domain API routes
pub fn routes() -> Router<ArtifactsState> {
    Router::new()
        .merge(narrative_routes())
        .merge(capability_routes())
}
