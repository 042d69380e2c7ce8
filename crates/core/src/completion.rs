//! Chat-completion client for the text model backend.
//!
//! Article text is appended to the user prompt after being cut down to a fixed
//! character budget. The cut is lossy on purpose: the budget is never exceeded,
//! even when that drops the end of the article.

use std::borrow::Cow;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::parse::char_len;
use crate::{ReferentError, Result};

/// Appended to article text that was cut to fit the budget.
pub const TRUNCATION_MARKER: &str = "\n\n[... статья обрезана из-за ограничений длины ...]";

/// Backend error fragments that mean the account ran out of credit or token budget.
const TOKEN_LIMIT_MARKERS: &[&str] = &["credits", "max_tokens", "afford"];

/// Configuration for [`OpenRouterClient`].
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Bearer token; requests fail with [`ReferentError::Config`] without one.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Sent as `HTTP-Referer`.
    pub referer: String,
    /// Sent as `X-Title`.
    pub app_title: String,
    /// Character budget for the article text.
    pub max_input_chars: usize,
    /// Completion budget when a request does not set its own.
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "deepseek/deepseek-chat".to_string(),
            referer: "http://localhost:3000".to_string(),
            app_title: "Referent AI Translator".to_string(),
            max_input_chars: 8000,
            max_tokens: 2000,
        }
    }
}

impl CompletionConfig {
    /// Default configuration with the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self { api_key: Some(api_key.into()), ..Default::default() }
    }
}

/// One instruction + article pair to send to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    /// Extracted article text, without markup.
    pub content: String,
    /// Overrides [`CompletionConfig::max_tokens`].
    pub max_tokens: Option<u32>,
}

/// Text-generation backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generates text for a request.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// "system", "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

/// [`CompletionClient`] for OpenRouter's OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http_client: Client,
    config: CompletionConfig,
}

impl OpenRouterClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self { http_client: Client::new(), config }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Builds the request body, truncating the article to the configured budget.
    pub fn chat_request(&self, request: &CompletionRequest) -> ChatRequest {
        let content = truncate_content(&request.content, self.config.max_input_chars);
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message::system(request.system_prompt.as_str()),
                Message::user(format!("{}\n\n{}", request.user_prompt, content)),
            ],
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ReferentError::Config("OPENROUTER_API_KEY is not configured".to_string()))
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let api_key = self.api_key()?;
        let body = self.chat_request(request);

        debug!(model = %body.model, max_tokens = body.max_tokens, "sending chat completion");
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .header(CONTENT_TYPE, "application/json")
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.app_title)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReferentError::Completion(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ReferentError::Completion(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ChatResponse>(&text)
                .ok()
                .and_then(|r| r.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            warn!(status = status.as_u16(), %message, "chat completion failed");
            return Err(api_error(message));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ReferentError::Completion(format!("Failed to parse response: {}", e)))?;
        first_choice(parsed)
    }
}

fn first_choice(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ReferentError::EmptyCompletion)
}

/// Maps a backend error message to [`ReferentError::TokenLimit`] or [`ReferentError::Completion`].
pub fn api_error(message: String) -> ReferentError {
    if TOKEN_LIMIT_MARKERS.iter().any(|marker| message.contains(marker)) {
        ReferentError::TokenLimit
    } else {
        ReferentError::Completion(message)
    }
}

/// Cuts text to at most `max_chars` characters, marker included.
///
/// Text within budget is returned unchanged.
///
/// # Example
///
/// ```rust
/// use referent_core::completion::{TRUNCATION_MARKER, truncate_content};
///
/// assert_eq!(truncate_content("short", 8000), "short");
///
/// let long = "a".repeat(9000);
/// let cut = truncate_content(&long, 8000);
/// assert_eq!(cut.chars().count(), 8000);
/// assert!(cut.ends_with(TRUNCATION_MARKER));
/// ```
pub fn truncate_content(content: &str, max_chars: usize) -> Cow<'_, str> {
    if char_len(content) <= max_chars {
        return Cow::Borrowed(content);
    }

    let marker_len = char_len(TRUNCATION_MARKER);
    if max_chars <= marker_len {
        return Cow::Owned(content.chars().take(max_chars).collect());
    }

    let mut truncated: String = content.chars().take(max_chars - marker_len).collect();
    truncated.push_str(TRUNCATION_MARKER);
    Cow::Owned(truncated)
}
