//! Artifacts domain: derived thumbnails and narratives for heritage assets

pub mod api;
pub mod domain;
pub mod orchestrator;
pub mod producers;

// Re-export domain types at the crate root for convenience
pub use domain::capability::{
    supports_thumbnail, CapabilityGate, CapabilityQuery, CapabilitySnapshot, THUMBNAIL_MIME_TYPES,
};
pub use domain::entities::{
    ArtifactKind, Capability, DerivedArtifact, NarrativeArtifact, NarrativeOptions,
    ThumbnailArtifact, ThumbnailOptions,
};
pub use domain::paths::derive_thumbnail_path;
pub use domain::state::{PipelineEvent, PipelineRun, PipelineState, PipelineStateMachine, StateError};

// Re-export producers and orchestration
pub use orchestrator::{ArtifactRequest, Orchestrator};
pub use producers::{NarrativeProducer, ProductionError, ThumbnailProducer};

// Re-export API types
pub use api::routes;
pub use api::ArtifactsState;
