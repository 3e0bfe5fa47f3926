//! Narration script generation via OpenAI chat completions.
//!
//! Without an OpenAI key the script is a one-line template. With a key,
//! one completion request is sent and the first choice is returned
//! verbatim; any API error is fatal.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::capability::{Capability, OpenAiCredentials};
use crate::http_client::{ensure_success, HttpClient};
use crate::types::{Script, ScriptSource, Topic};

/// Produces narration for a topic.
#[async_trait]
pub trait ScriptWriter: Send + Sync {
    async fn generate(&self, topic: &Topic) -> Result<Script>;
}

/// Script used when no model credential is configured.
#[must_use]
pub fn template_script(topic: &Topic) -> String {
    format!("An overview of {topic}. Stay updated!")
}

/// Prompt sent to the model.
#[must_use]
pub fn script_prompt(topic: &Topic) -> String {
    format!(
        "Write an engaging YouTube video script about {topic}. \
         Make it informative, engaging, and encourage viewer interaction. \
         Include a call to action for comments and subscriptions."
    )
}

/// [`ScriptWriter`] that calls the chat-completions API when enabled
pub struct ScriptGenerator {
    client: HttpClient,
    api_base: String,
    model: String,
    capability: Capability<OpenAiCredentials>,
}

impl ScriptGenerator {
    pub fn new(
        client: HttpClient,
        api_base: impl Into<String>,
        model: impl Into<String>,
        capability: Capability<OpenAiCredentials>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            model: model.into(),
            capability,
        }
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, topic: &Topic, credentials: &OpenAiCredentials) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: script_prompt(topic),
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&credentials.api_key)
            .json(&request)
            .send()
            .await
            .context("OpenAI request failed")?;
        let response = ensure_success(response, "OpenAI").await?;

        let completion: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("OpenAI response contained no choices")
    }
}

#[async_trait]
impl ScriptWriter for ScriptGenerator {
    async fn generate(&self, topic: &Topic) -> Result<Script> {
        match &self.capability {
            Capability::Enabled(credentials) => {
                info!(%topic, "Generating video script");
                let text = self.complete(topic, credentials).await?;
                Ok(Script {
                    topic: topic.clone(),
                    text,
                    source: ScriptSource::Model,
                })
            }
            Capability::Disabled { .. } | Capability::NotImplemented => {
                info!("Skipping script generation (OpenAI API key missing), using template");
                Ok(Script {
                    topic: topic.clone(),
                    text: template_script(topic),
                    source: ScriptSource::Template,
                })
            }
        }
    }
}

// ============================================================================
// Chat Completions API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
