//! Artifact producers

pub mod error;
pub mod narrative;
pub mod thumbnail;

pub use error::ProductionError;
pub use narrative::NarrativeProducer;
pub use thumbnail::ThumbnailProducer;
