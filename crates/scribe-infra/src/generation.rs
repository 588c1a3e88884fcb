//! OpenAI-compatible chat-completions client (Groq by default).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use scribe_core::ports::{GenerationError, TextGenerator};

/// Longest provider error body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Text generation provider configuration.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Provider API key. No key means no provider: every request uses the offline fallback.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            timeout: Duration::from_secs(10),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

impl GenerationConfig {
    /// Load from `GROQ_API_KEY`, `GROQ_BASE_URL`, `GROQ_MODEL` and `GENERATION_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GROQ_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            base_url: std::env::var("GROQ_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("GROQ_MODEL").unwrap_or(defaults.model),
            timeout: std::env::var("GENERATION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            ..defaults
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
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
    content: Option<String>,
}

/// `TextGenerator` backed by a `/chat/completions` endpoint.
///
/// One attempt per call, bounded by the configured timeout.
pub struct ChatCompletionGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatCompletionGenerator {
    pub fn new(api_key: String, config: &GenerationConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the provider if an API key is configured.
    pub fn from_config(config: &GenerationConfig) -> Option<Arc<dyn TextGenerator>> {
        let Some(api_key) = config.api_key.clone() else {
            tracing::warn!("GROQ_API_KEY not set. AI actions will use the offline fallback.");
            return None;
        };

        match Self::new(api_key, config) {
            Ok(generator) => {
                tracing::info!(model = %config.model, "Text generation provider configured");
                Some(Arc::new(generator))
            }
            Err(e) => {
                tracing::error!("Failed to build generation client: {}. Using offline fallback.", e);
                None
            }
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// First non-empty completion in a provider response.
fn extract_content(response: ChatResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| GenerationError::InvalidResponse("response contained no content".to_string()))
}

#[async_trait]
impl TextGenerator for ChatCompletionGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        extract_content(parsed)
    }
}
