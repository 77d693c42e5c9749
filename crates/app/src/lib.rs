//! Heritage application composition root
//!
//! Wires the project store, narrative backend and capability snapshot into
//! the Artifacts domain router.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use heritage_artifacts::{ArtifactsState, CapabilitySnapshot, NarrativeProducer, Orchestrator};
use heritage_common::config::Config;
use heritage_llm::{LlmConfig, LlmService, LlmServiceFactory};
use heritage_projects::{InMemoryProjectStore, ProjectLookup, ProjectRepository};
use sqlx::PgPool;

/// Create the main application router from configuration
pub async fn create_app(config: &Config, llm_config: LlmConfig) -> Result<Router, anyhow::Error> {
    tokio::fs::create_dir_all(&config.upload_root)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Upload root {} is not usable: {}",
                config.upload_root.display(),
                e
            )
        })?;

    let projects: Arc<dyn ProjectLookup> = match &config.database_url {
        Some(url) => {
            let pool = PgPool::connect(url)
                .await
                .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;
            tracing::info!("Using PostgreSQL project store");
            Arc::new(ProjectRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory project store");
            Arc::new(InMemoryProjectStore::new())
        }
    };

    let capabilities = CapabilitySnapshot::from_llm_config(&llm_config);
    if !capabilities.narrative_backend_configured {
        tracing::warn!(
            provider = %llm_config.provider,
            "Narrative backend credential missing, narrative generation disabled"
        );
    }

    let timeout = llm_config.timeout;
    let llm: Arc<dyn LlmService> = Arc::from(LlmServiceFactory::create(llm_config)?);

    Ok(build_router(
        projects,
        llm,
        capabilities,
        timeout,
        config.upload_root.clone(),
    ))
}

/// Compose the router from already-built collaborators.
///
/// Relative primary-asset locators are resolved against `upload_root`.
pub fn build_router(
    projects: Arc<dyn ProjectLookup>,
    llm: Arc<dyn LlmService>,
    capabilities: CapabilitySnapshot,
    narrative_timeout: Duration,
    upload_root: PathBuf,
) -> Router {
    let orchestrator = Orchestrator::new(projects, NarrativeProducer::new(llm, narrative_timeout))
        .with_upload_root(upload_root);
    let artifacts_state = ArtifactsState::new(orchestrator, capabilities);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Heritage API v0.0.1-SNAPSHOT" }),
        )
        .merge(heritage_artifacts::routes().with_state(artifacts_state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
