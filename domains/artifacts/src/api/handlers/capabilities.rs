//! Capability reporting API handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::domain::capability::{
    CapabilityGate, CapabilityQuery, CapabilitySnapshot, THUMBNAIL_MIME_TYPES,
};
use crate::domain::entities::Capability;

/// Thumbnail support summary
#[derive(Debug, Serialize)]
pub struct ThumbnailCapabilities {
    pub supported_mime_types: Vec<&'static str>,
}

/// What this instance can currently produce
#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub narrative: Capability,
    pub thumbnail: ThumbnailCapabilities,
}

impl CapabilitiesResponse {
    pub fn from_snapshot(snapshot: &CapabilitySnapshot) -> Self {
        Self {
            narrative: CapabilityGate::is_available(snapshot, CapabilityQuery::Narrative),
            thumbnail: ThumbnailCapabilities {
                supported_mime_types: THUMBNAIL_MIME_TYPES.to_vec(),
            },
        }
    }
}

/// Report which derived artifacts can be produced
pub async fn get_capabilities(
    State(snapshot): State<Arc<CapabilitySnapshot>>,
) -> Json<CapabilitiesResponse> {
    Json(CapabilitiesResponse::from_snapshot(&snapshot))
}
