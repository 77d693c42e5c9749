//! Domain entities for Artifacts domain
//!
//! A derived artifact is a computed secondary representation of a primary
//! asset: a JPEG thumbnail beside the uploaded image, or a narrative text
//! written from a project's stored metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use heritage_common::{Error, Result};

/// Default thumbnail width in pixels
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 400;

/// Default thumbnail height in pixels
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 300;

/// Default JPEG quality
pub const DEFAULT_THUMBNAIL_QUALITY: u8 = 80;

/// Largest accepted thumbnail edge
pub const MAX_THUMBNAIL_DIMENSION: u32 = 4096;

/// Derived artifact kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Thumbnail,
    Narrative,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Thumbnail => write!(f, "thumbnail"),
            ArtifactKind::Narrative => write!(f, "narrative"),
        }
    }
}

/// Whether an artifact kind can currently be produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Capability {
    pub fn available() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
        }
    }
}

/// Thumbnail generation options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ThumbnailOptions {
    #[validate(range(min = 1, max = 4096))]
    pub width: u32,
    #[validate(range(min = 1, max = 4096))]
    pub height: u32,
    pub quality: u8,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_THUMBNAIL_WIDTH,
            height: DEFAULT_THUMBNAIL_HEIGHT,
            quality: DEFAULT_THUMBNAIL_QUALITY,
        }
    }
}

impl ThumbnailOptions {
    pub fn new(width: u32, height: u32, quality: u8) -> Self {
        Self {
            width,
            height,
            quality,
        }
    }

    /// Reject unusable dimensions and clamp quality into 1..=100
    pub fn normalized(self) -> Result<Self> {
        self.validate()
            .map_err(|e| Error::Validation(format!("Invalid thumbnail options: {}", e)))?;

        Ok(Self {
            quality: self.quality.clamp(1, 100),
            ..self
        })
    }
}

/// Narrative generation options
///
/// Every field is optional. Omitted fields fall back to producer defaults
/// and then to backend defaults; unknown keys in a request body are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
}

impl NarrativeOptions {
    /// Fill unset fields from `defaults`; fields set here always win
    pub fn merged_with(self, defaults: &NarrativeOptions) -> NarrativeOptions {
        NarrativeOptions {
            model: self.model.or_else(|| defaults.model.clone()),
            max_tokens: self.max_tokens.or(defaults.max_tokens),
            temperature: self.temperature.or(defaults.temperature),
            tone: self.tone.or_else(|| defaults.tone.clone()),
            audience: self.audience.or_else(|| defaults.audience.clone()),
            language: self.language.or_else(|| defaults.language.clone()),
            length: self.length.or_else(|| defaults.length.clone()),
        }
    }
}

/// Thumbnail written beside a primary asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailArtifact {
    pub source: PathBuf,
    pub locator: PathBuf,
    pub width: u32,
    pub height: u32,
    pub options: ThumbnailOptions,
    pub generated_at: DateTime<Utc>,
}

/// Narrative written for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeArtifact {
    pub project_id: Uuid,
    pub content: String,
    pub model: String,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub options: NarrativeOptions,
    pub generated_at: DateTime<Utc>,
}

/// Any derived artifact, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DerivedArtifact {
    Thumbnail(ThumbnailArtifact),
    Narrative(NarrativeArtifact),
}

impl DerivedArtifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            DerivedArtifact::Thumbnail(_) => ArtifactKind::Thumbnail,
            DerivedArtifact::Narrative(_) => ArtifactKind::Narrative,
        }
    }
}

impl From<ThumbnailArtifact> for DerivedArtifact {
    fn from(artifact: ThumbnailArtifact) -> Self {
        DerivedArtifact::Thumbnail(artifact)
    }
}

impl From<NarrativeArtifact> for DerivedArtifact {
    fn from(artifact: NarrativeArtifact) -> Self {
        DerivedArtifact::Narrative(artifact)
    }
}
