//! Capability gate
//!
//! Decides whether an artifact kind can currently be produced. The gate is
//! pure: it reads only the immutable snapshot it is handed, never process
//! state, and always answers with a `Capability` rather than an error.

use serde::{Deserialize, Serialize};

use heritage_llm::LlmConfig;

use crate::domain::entities::{ArtifactKind, Capability};

/// Source mime types a thumbnail can be produced from
pub const THUMBNAIL_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/tiff",
    "image/gif",
];

/// Whether a thumbnail can be produced from a source of this mime type.
///
/// Matching ignores ASCII case, surrounding whitespace, and parameters such
/// as `; charset=binary`.
pub fn supports_thumbnail(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();

    THUMBNAIL_MIME_TYPES
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(essence))
}

/// Immutable view of the configuration the gate decides against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySnapshot {
    /// Narrative backend has the credential it needs
    pub narrative_backend_configured: bool,
}

impl CapabilitySnapshot {
    pub fn new(narrative_backend_configured: bool) -> Self {
        Self {
            narrative_backend_configured,
        }
    }

    /// Derive the snapshot from LLM configuration.
    ///
    /// The mock provider needs no credential; any other provider needs a
    /// non-blank API key.
    pub fn from_llm_config(config: &LlmConfig) -> Self {
        Self::new(config.is_mock() || config.has_credential())
    }
}

/// What is being asked of the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityQuery<'a> {
    Narrative,
    Thumbnail { content_type: &'a str },
}

impl CapabilityQuery<'_> {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            CapabilityQuery::Narrative => ArtifactKind::Narrative,
            CapabilityQuery::Thumbnail { .. } => ArtifactKind::Thumbnail,
        }
    }
}

/// Capability gate
pub struct CapabilityGate;

impl CapabilityGate {
    /// Decide whether the queried artifact can be produced under `snapshot`
    pub fn is_available(snapshot: &CapabilitySnapshot, query: CapabilityQuery<'_>) -> Capability {
        match query {
            CapabilityQuery::Narrative if snapshot.narrative_backend_configured => {
                Capability::available()
            }
            CapabilityQuery::Narrative => Capability::unavailable(
                "Narrative generation is not configured: the narrative backend credential is missing",
            ),
            CapabilityQuery::Thumbnail { content_type } if supports_thumbnail(content_type) => {
                Capability::available()
            }
            CapabilityQuery::Thumbnail { content_type } => Capability::unavailable(format!(
                "Thumbnails cannot be produced from '{}' sources",
                content_type
            )),
        }
    }
}
