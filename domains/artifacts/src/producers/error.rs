//! Producer-level failures

use std::time::Duration;

use heritage_llm::LlmError;

/// Why a producer could not deliver an artifact
#[derive(Debug, thiserror::Error)]
pub enum ProductionError {
    #[error("Source image could not be read: {0}")]
    SourceUnreadable(#[source] std::io::Error),

    #[error("Source image could not be decoded: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Thumbnail could not be encoded: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Thumbnail could not be written: {0}")]
    Write(#[source] std::io::Error),

    #[error("Thumbnail task aborted: {0}")]
    TaskAborted(String),

    #[error("Narrative backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("Narrative backend timed out after {}s", .0.as_secs_f32())]
    BackendTimeout(Duration),

    #[error("Narrative backend returned no text")]
    EmptyNarrative,
}

impl From<ProductionError> for heritage_common::Error {
    fn from(err: ProductionError) -> Self {
        heritage_common::Error::production(err)
    }
}
