//! Derived-artifact orchestrator
//!
//! Sequences one request through the pipeline: capability gate, existence
//! check, producer. Capability and existence failures end the run before
//! any later step executes. The orchestrator keeps no state between calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use heritage_common::{Error, Result};
use heritage_projects::{PrimaryAsset, ProjectLookup};

use crate::domain::capability::{CapabilityGate, CapabilityQuery, CapabilitySnapshot};
use crate::domain::entities::{
    ArtifactKind, DerivedArtifact, NarrativeArtifact, NarrativeOptions, ThumbnailArtifact,
    ThumbnailOptions,
};
use crate::domain::paths::derive_thumbnail_path;
use crate::domain::state::{PipelineEvent, PipelineRun};
use crate::producers::{NarrativeProducer, ProductionError, ThumbnailProducer};

/// A request for one derived artifact
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactRequest {
    Narrative {
        project_id: Uuid,
        options: NarrativeOptions,
    },
    Thumbnail {
        asset: PrimaryAsset,
        options: ThumbnailOptions,
    },
}

impl ArtifactRequest {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactRequest::Narrative { .. } => ArtifactKind::Narrative,
            ArtifactRequest::Thumbnail { .. } => ArtifactKind::Thumbnail,
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    projects: Arc<dyn ProjectLookup>,
    narratives: NarrativeProducer,
    thumbnails: ThumbnailProducer,
    upload_root: Option<PathBuf>,
}

impl Orchestrator {
    pub fn new(projects: Arc<dyn ProjectLookup>, narratives: NarrativeProducer) -> Self {
        Self {
            projects,
            narratives,
            thumbnails: ThumbnailProducer::new(),
            upload_root: None,
        }
    }

    /// Resolve relative asset locators against `root`
    pub fn with_upload_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.upload_root = Some(root.into());
        self
    }

    /// Produce whichever artifact `request` asks for
    pub async fn produce(
        &self,
        snapshot: &CapabilitySnapshot,
        request: ArtifactRequest,
    ) -> Result<DerivedArtifact> {
        match request {
            ArtifactRequest::Narrative {
                project_id,
                options,
            } => self
                .narrative(snapshot, &project_id.to_string(), options)
                .await
                .map(DerivedArtifact::from),
            ArtifactRequest::Thumbnail { asset, options } => self
                .thumbnail_for_asset(snapshot, &asset, options)
                .await
                .map(DerivedArtifact::from),
        }
    }

    /// Generate a fresh narrative for a project.
    ///
    /// `project_id` is parsed only after the capability check, so an
    /// unavailable backend is reported even for a malformed id.
    pub async fn narrative(
        &self,
        snapshot: &CapabilitySnapshot,
        project_id: &str,
        options: NarrativeOptions,
    ) -> Result<NarrativeArtifact> {
        let mut run = PipelineRun::new();
        let result = self
            .run_narrative(&mut run, snapshot, project_id, options)
            .await;
        finish(run, ArtifactKind::Narrative, result)
    }

    /// Write (or overwrite) the thumbnail beside a primary asset
    pub async fn thumbnail_for_asset(
        &self,
        snapshot: &CapabilitySnapshot,
        asset: &PrimaryAsset,
        options: ThumbnailOptions,
    ) -> Result<ThumbnailArtifact> {
        let mut run = PipelineRun::new();
        let result = self.run_thumbnail(&mut run, snapshot, asset, options).await;
        finish(run, ArtifactKind::Thumbnail, result)
    }

    async fn run_narrative(
        &self,
        run: &mut PipelineRun,
        snapshot: &CapabilitySnapshot,
        project_id: &str,
        options: NarrativeOptions,
    ) -> Result<NarrativeArtifact> {
        step(run, PipelineEvent::Begin)?;

        require(snapshot, CapabilityQuery::Narrative)?;
        step(run, PipelineEvent::CapabilityGranted)?;

        let project_id = parse_project_id(project_id)?;

        let project = self
            .projects
            .find(project_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Project {} not found", project_id)))?;
        step(run, PipelineEvent::EntityFound)?;

        let artifact = self.narratives.generate(&project, options).await?;
        step(run, PipelineEvent::Produced)?;

        Ok(artifact)
    }

    async fn run_thumbnail(
        &self,
        run: &mut PipelineRun,
        snapshot: &CapabilitySnapshot,
        asset: &PrimaryAsset,
        options: ThumbnailOptions,
    ) -> Result<ThumbnailArtifact> {
        step(run, PipelineEvent::Begin)?;

        require(
            snapshot,
            CapabilityQuery::Thumbnail {
                content_type: &asset.content_type,
            },
        )?;
        step(run, PipelineEvent::CapabilityGranted)?;

        let options = options.normalized()?;
        let source = self.resolve(asset.locator());

        if let Some(project_id) = asset.project_id {
            if !self.projects.exists(project_id).await? {
                return Err(Error::NotFound(format!("Project {} not found", project_id)));
            }
        }
        let source_present = tokio::fs::try_exists(&source)
            .await
            .map_err(ProductionError::SourceUnreadable)?;
        if !source_present {
            return Err(Error::NotFound(format!(
                "Source asset {} not found",
                source.display()
            )));
        }
        step(run, PipelineEvent::EntityFound)?;

        let dest = derive_thumbnail_path(&source);
        let locator = self.thumbnails.generate(&source, &dest, &options).await?;
        step(run, PipelineEvent::Produced)?;

        Ok(ThumbnailArtifact {
            source,
            locator,
            width: options.width,
            height: options.height,
            options,
            generated_at: Utc::now(),
        })
    }

    fn resolve(&self, locator: &Path) -> PathBuf {
        match &self.upload_root {
            Some(root) if locator.is_relative() => root.join(locator),
            _ => locator.to_path_buf(),
        }
    }
}

fn parse_project_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| Error::Validation("Invalid project ID".to_string()))
}

/// Fail with `ServiceUnavailable` unless the gate allows the query
fn require(snapshot: &CapabilitySnapshot, query: CapabilityQuery<'_>) -> Result<()> {
    let capability = CapabilityGate::is_available(snapshot, query);
    if capability.available {
        return Ok(());
    }

    let reason = capability
        .reason
        .unwrap_or_else(|| format!("{} generation is unavailable", query.kind()));
    Err(Error::ServiceUnavailable(reason))
}

fn step(run: &mut PipelineRun, event: PipelineEvent) -> Result<()> {
    run.advance(event)
        .map(|_| ())
        .map_err(|e| Error::Internal(format!("Pipeline state error: {}", e)))
}

fn finish<T>(mut run: PipelineRun, kind: ArtifactKind, result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => {
            tracing::info!(kind = %kind, trace = ?run.trace(), "Derived artifact produced");
        }
        Err(e) => {
            let failed_in = run.state();
            if run.advance(PipelineEvent::Fail).is_err() {
                tracing::error!(kind = %kind, state = %failed_in, "Pipeline failed after terminal state");
            }
            tracing::warn!(
                kind = %kind,
                failed_in = %failed_in,
                code = e.error_code(),
                error = %e,
                "Derived artifact not produced"
            );
        }
    }
    result
}
