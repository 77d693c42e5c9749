//! Artifacts domain state

use std::sync::Arc;

use axum::extract::FromRef;

use crate::domain::capability::CapabilitySnapshot;
use crate::orchestrator::Orchestrator;

/// Application state for the Artifacts domain
#[derive(Clone)]
pub struct ArtifactsState {
    pub orchestrator: Orchestrator,
    pub capabilities: Arc<CapabilitySnapshot>,
}

impl ArtifactsState {
    pub fn new(orchestrator: Orchestrator, capabilities: CapabilitySnapshot) -> Self {
        Self {
            orchestrator,
            capabilities: Arc::new(capabilities),
        }
    }
}

impl FromRef<ArtifactsState> for Arc<CapabilitySnapshot> {
    fn from_ref(state: &ArtifactsState) -> Self {
        state.capabilities.clone()
    }
}
