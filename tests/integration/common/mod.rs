//! Common test utilities and fixtures for integration tests
//!
//! Builds the application router over an in-memory project store and a
//! narrative backend double that counts its calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, Response},
    Router,
};
use serde_json::Value;
use uuid::Uuid;

use heritage_artifacts::CapabilitySnapshot;
use heritage_common::Result;
use heritage_llm::{CompletionRequest, CompletionResponse, LlmError, LlmService};
use heritage_projects::{InMemoryProjectStore, Project, ProjectLookup};

/// How the narrative backend double answers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backend {
    Healthy,
    Failing,
    Hanging,
}

/// Narrative backend double
pub struct CountingLlm {
    calls: AtomicUsize,
    backend: Backend,
}

impl CountingLlm {
    pub fn new(backend: Backend) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            backend,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmService for CountingLlm {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, LlmError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.backend {
            Backend::Healthy => Ok(CompletionResponse {
                content: format!("Narrative {} ({} prompt messages)", n, request.messages.len()),
                model: "counting-model".to_string(),
                input_tokens: 42,
                output_tokens: 17,
                stop_reason: "end_turn".to_string(),
            }),
            Backend::Failing => Err(LlmError::Response(
                "Anthropic API error (api_error): Internal server error".to_string(),
            )),
            Backend::Hanging => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(LlmError::Request("gave up".to_string()))
            }
        }
    }

    fn default_model(&self) -> &str {
        "counting-model"
    }
}

/// Project store wrapper that counts lookups
#[derive(Default)]
pub struct CountingProjects {
    pub store: InMemoryProjectStore,
    lookups: AtomicUsize,
}

impl CountingProjects {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ProjectLookup for CountingProjects {
    async fn find(&self, id: Uuid) -> Result<Option<Project>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.store.find(id).await
    }
}

/// Router plus handles on its collaborators
pub struct TestApp {
    pub projects: Arc<CountingProjects>,
    pub llm: Arc<CountingLlm>,
    router: Router,
}

impl TestApp {
    /// App whose narrative backend is configured and healthy
    pub fn new() -> Self {
        Self::with(true, Backend::Healthy)
    }

    /// App without a narrative backend credential
    pub fn unconfigured() -> Self {
        Self::with(false, Backend::Healthy)
    }

    pub fn with(narrative_configured: bool, backend: Backend) -> Self {
        let projects = Arc::new(CountingProjects::default());
        let llm = Arc::new(CountingLlm::new(backend));
        let router = heritage_app::build_router(
            projects.clone(),
            llm.clone(),
            CapabilitySnapshot::new(narrative_configured),
            Duration::from_millis(200),
            std::env::temp_dir(),
        );

        Self {
            projects,
            llm,
            router,
        }
    }

    /// Fresh clone of the router for a single `oneshot`
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Store a project and return its ID
    pub fn create_project(&self, name: &str) -> Uuid {
        let project = Project::new(name.to_string(), Some(format!("{} survey record", name)))
            .unwrap()
            .with_location("Ghent");
        self.projects.store.insert(project).unwrap()
    }
}

/// Build a request with an optional raw body
pub fn request(method: Method, uri: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(raw) => builder
            .header("content-type", "application/json")
            .body(Body::from(raw.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Parse response body as JSON Value
pub async fn parse_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
