//! LLM Client — the single point of entry for chat-completion calls.
//!
//! No other module talks to the completion endpoint directly; the analysis
//! pipeline depends only on the `CompletionClient` trait.
//!
//! Model and temperature are pinned. Only the endpoint URL is configurable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AnalysisError;

#[cfg(test)]
pub mod testing;

/// The model used for every completion.
pub const MODEL: &str = "deepseek-chat";
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("completion has no message content")]
    EmptyContent,
}

impl From<LlmError> for AnalysisError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(e) => AnalysisError::Transport {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            LlmError::Timeout(_) => AnalysisError::Transport {
                status: None,
                message: err.to_string(),
            },
            LlmError::Api { status, message } => AnalysisError::Transport {
                status: Some(status),
                message,
            },
            LlmError::Parse(_) | LlmError::EmptyContent => {
                AnalysisError::ResponseFormat(err.to_string())
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Expected 2xx body. Every field is required; a body that does not match
/// fails to deserialize instead of being read leniently.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

impl ChatResponse {
    /// Content of the first choice, if it has any non-whitespace text.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|c| c.message.content.as_str())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Sends one prompt and returns the raw completion text.
///
/// The credential is passed per call because the user can change it at any
/// time between analyses.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, LlmError>;
}

/// `CompletionClient` over an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    /// Single request/response round trip. Non-2xx statuses, network errors
    /// and timeouts are transport errors; a 2xx body that does not match
    /// `ChatResponse` is a format error. Nothing is retried.
    async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion API returned {}: {}", status, truncate(&body, 200));
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let text = parsed.text().ok_or(LlmError::EmptyContent)?;

        debug!(
            "Completion succeeded: {} choices, {} chars",
            parsed.choices.len(),
            text.len()
        );

        Ok(text.to_string())
    }
}

impl LlmClient {
    fn classify(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Http(err)
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
