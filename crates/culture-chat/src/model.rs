//! Remote chat-completion collaborator.
//!
//! `ChatCompletion` is the seam the orchestrator talks to; `OpenRouterClient`
//! implements it against any OpenAI-compatible `/chat/completions` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use culture_core::config::ModelConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ModelCallError;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

/// One entry of the `messages` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
    /// Opaque reasoning trace echoed back on the assistant turn of pass 2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_details: Option<Value>,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            content: content.into(),
            reasoning_details: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            reasoning_details: None,
        }
    }

    pub fn assistant(content: impl Into<String>, reasoning_details: Option<Value>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            reasoning_details,
        }
    }
}

/// A model-agnostic completion request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletionRequest {
    pub messages: Vec<ChatTurn>,
    /// Ask the model to produce a reasoning trace.
    pub reasoning: bool,
}

/// The assistant message of the first choice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_details: Option<Value>,
}

impl CompletionMessage {
    /// Trimmed content, or `None` when blank.
    pub fn text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<ReasoningOptions>,
}

#[derive(Debug, Serialize)]
struct ReasoningOptions {
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    #[serde(default)]
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    error: WireError,
}

// =============================================================================
// Collaborator trait
// =============================================================================

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Whether a call can be attempted at all (e.g. a credential is present).
    fn is_available(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionMessage, ModelCallError>;
}

// =============================================================================
// OpenRouter client
// =============================================================================

pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    http_referer: Option<String>,
    x_title: Option<String>,
}

impl OpenRouterClient {
    /// Build a client. `api_key` is resolved by the caller, never read here.
    pub fn new(config: &ModelConfig, api_key: Option<String>) -> Result<Self, ModelCallError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelCallError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key,
            http_referer: config.http_referer.clone(),
            x_title: config.x_title.clone(),
        })
    }

    /// Build from configuration, resolving the credential from the environment.
    pub fn from_config(config: &ModelConfig) -> Result<Self, ModelCallError> {
        Self::new(config, config.credential())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, api_key: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let mut req = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key));

        if let Some(ref referer) = self.http_referer {
            req = req.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.x_title {
            req = req.header("X-Title", title);
        }

        req.header("Content-Type", "application/json")
    }
}

fn error_status(code: Option<&Value>, fallback: u16) -> u16 {
    code.and_then(Value::as_u64)
        .and_then(|c| u16::try_from(c).ok())
        .unwrap_or(fallback)
}

#[async_trait]
impl ChatCompletion for OpenRouterClient {
    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionMessage, ModelCallError> {
        let api_key = self.api_key.as_deref().ok_or(ModelCallError::MissingCredential)?;

        let body = WireRequest {
            model: &self.model,
            messages: &request.messages,
            reasoning: request.reasoning.then_some(ReasoningOptions { enabled: true }),
        };

        debug!(
            model = %self.model,
            turns = request.messages.len(),
            reasoning = request.reasoning,
            "Sending chat completion request"
        );

        let response = self
            .build_request(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelCallError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ModelCallError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<WireErrorBody>(&text)
                .map(|b| b.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(ModelCallError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: WireResponse =
            serde_json::from_str(&text).map_err(|e| ModelCallError::Malformed(e.to_string()))?;

        if let Some(err) = parsed.error {
            return Err(ModelCallError::Http {
                status: error_status(err.code.as_ref(), status.as_u16()),
                message: err.message,
            });
        }

        let message = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .ok_or(ModelCallError::EmptyReply)?;

        if message.text().is_none() {
            return Err(ModelCallError::EmptyReply);
        }
        Ok(message)
    }
}
