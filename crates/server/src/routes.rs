//! Route handlers.
//!
//! Every `/api/*` route takes `{ "url": string }`, fetches the page and runs
//! extraction before doing its own work.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use referent_core::{Extraction, ExtractionOutcome, Task, illustrate, run_task};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

impl UrlRequest {
    /// Reads the body leniently: malformed JSON or a non-string `url` count as missing.
    fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    fn url(&self) -> Result<&str, ApiError> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ApiError::MissingUrl)
    }
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub date: Option<String>,
    pub title: Option<String>,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct IllustrationResponse {
    pub illustration: String,
    pub prompt: String,
}

/// An article that passed the extraction gate.
struct Article {
    url: String,
    content: String,
    extraction: Extraction,
}

async fn load_article(state: &AppState, body: &[u8]) -> Result<Article, ApiError> {
    let request = UrlRequest::from_body(body);
    let url = request.url()?.to_string();

    let html = state.fetcher.fetch(&url).await?;
    let extraction = state.reader.extract_html_with_url(&html, &url)?;

    match &extraction.outcome {
        ExtractionOutcome::Success { content } => {
            Ok(Article { content: content.clone(), url, extraction })
        }
        ExtractionOutcome::Failure { reason, .. } => Err(ApiError::Extraction(*reason)),
    }
}

async fn generate(state: &AppState, body: &[u8], task: Task) -> Result<String, ApiError> {
    let article = load_article(state, body).await?;
    let output = run_task(state.completion.as_ref(), task, &article.content, Some(&article.url)).await?;
    info!(task = task.name(), url = %article.url, "artifact generated");
    Ok(output)
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "ok"
}

pub async fn parse(State(state): State<AppState>, body: Bytes) -> Result<Json<ParseResponse>, ApiError> {
    let article = load_article(&state, &body).await?;
    let metadata = article.extraction.metadata;

    Ok(Json(ParseResponse { date: metadata.date, title: metadata.title, content: article.content }))
}

pub async fn about(State(state): State<AppState>, body: Bytes) -> Result<Json<serde_json::Value>, ApiError> {
    let summary = generate(&state, &body, Task::Summary).await?;
    Ok(Json(serde_json::json!({ "summary": summary })))
}

pub async fn thesis(State(state): State<AppState>, body: Bytes) -> Result<Json<serde_json::Value>, ApiError> {
    let thesis = generate(&state, &body, Task::Thesis).await?;
    Ok(Json(serde_json::json!({ "thesis": thesis })))
}

pub async fn telegram(State(state): State<AppState>, body: Bytes) -> Result<Json<serde_json::Value>, ApiError> {
    let post = generate(&state, &body, Task::Telegram).await?;
    Ok(Json(serde_json::json!({ "post": post })))
}

pub async fn translate(State(state): State<AppState>, body: Bytes) -> Result<Json<serde_json::Value>, ApiError> {
    let translation = generate(&state, &body, Task::Translate).await?;
    Ok(Json(serde_json::json!({ "translation": translation })))
}

pub async fn illustration(
    State(state): State<AppState>, body: Bytes,
) -> Result<Json<IllustrationResponse>, ApiError> {
    let article = load_article(&state, &body).await?;
    let (prompt, image) = illustrate(state.completion.as_ref(), state.image.as_ref(), &article.content).await?;
    info!(url = %article.url, bytes = image.bytes.len(), "illustration generated");

    Ok(Json(IllustrationResponse { illustration: image.to_data_url(), prompt }))
}
