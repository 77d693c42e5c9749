//! Narrative producer
//!
//! Writes interpretive text about a project by calling the narrative
//! backend. Identical calls may return different text; nothing is cached.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use heritage_llm::{CompletionRequest, LlmMessage, LlmService};
use heritage_projects::Project;

use crate::domain::entities::{NarrativeArtifact, NarrativeOptions};
use crate::producers::ProductionError;

const SYSTEM_PROMPT: &str = "You are a heritage interpretation writer. \
    You turn catalogue records about historic places, buildings and objects \
    into accurate, engaging narratives for visitors. Never invent dates, names \
    or events that the record does not support.";

/// Produces narratives through an injected `LlmService`
#[derive(Clone)]
pub struct NarrativeProducer {
    llm: Arc<dyn LlmService>,
    timeout: Duration,
    defaults: NarrativeOptions,
}

impl NarrativeProducer {
    pub fn new(llm: Arc<dyn LlmService>, timeout: Duration) -> Self {
        Self {
            llm,
            timeout,
            defaults: NarrativeOptions::default(),
        }
    }

    /// Options applied where a request leaves fields unset
    pub fn with_defaults(mut self, defaults: NarrativeOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Generate a narrative for `project`.
    ///
    /// The backend call is bounded by the producer timeout; on expiry the
    /// in-flight request is dropped and `BackendTimeout` is returned.
    pub async fn generate(
        &self,
        project: &Project,
        options: NarrativeOptions,
    ) -> Result<NarrativeArtifact, ProductionError> {
        let options = options.merged_with(&self.defaults);
        let request = build_request(project, &options);

        let response = tokio::time::timeout(self.timeout, self.llm.complete(request))
            .await
            .map_err(|_| ProductionError::BackendTimeout(self.timeout))??;

        if response.content.trim().is_empty() {
            return Err(ProductionError::EmptyNarrative);
        }

        Ok(NarrativeArtifact {
            project_id: project.id,
            content: response.content,
            model: response.model,
            input_tokens: response.input_tokens,
            output_tokens: response.output_tokens,
            options,
            generated_at: Utc::now(),
        })
    }
}

fn build_request(project: &Project, options: &NarrativeOptions) -> CompletionRequest {
    CompletionRequest {
        model: options.model.clone().unwrap_or_default(),
        system_prompt: Some(SYSTEM_PROMPT.to_string()),
        messages: vec![LlmMessage::user(project_prompt(project, options))],
        max_tokens: options.max_tokens,
        temperature: options.temperature,
    }
}

fn project_prompt(project: &Project, options: &NarrativeOptions) -> String {
    let mut lines = vec![
        "Write a narrative about the following heritage project.".to_string(),
        String::new(),
        format!("Name: {}", project.name),
    ];

    if let Some(location) = &project.location {
        lines.push(format!("Location: {}", location));
    }
    if let Some(description) = &project.description {
        lines.push(format!("Description: {}", description));
    }
    if project.has_metadata() {
        let metadata = serde_json::to_string_pretty(&project.metadata.0)
            .unwrap_or_else(|_| project.metadata.0.to_string());
        lines.push(format!("Catalogue record:\n{}", metadata));
    }

    let guidance: Vec<String> = [
        ("Tone", &options.tone),
        ("Audience", &options.audience),
        ("Language", &options.language),
        ("Length", &options.length),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|v| format!("- {}: {}", label, v)))
    .collect();

    if !guidance.is_empty() {
        lines.push(String::new());
        lines.push("Guidance:".to_string());
        lines.extend(guidance);
    }

    lines.join("\n") + "\n"
}
