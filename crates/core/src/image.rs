//! Text-to-image client for article illustrations.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{ReferentError, Result};

/// Configuration for [`HuggingFaceClient`].
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Bearer token; requests fail with [`ReferentError::Config`] without one.
    pub api_key: Option<String>,
    /// Inference endpoint of the diffusion model.
    pub endpoint: String,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://router.huggingface.co/hf-inference/models/stabilityai/stable-diffusion-xl-base-1.0"
                .to_string(),
            num_inference_steps: 30,
            guidance_scale: 7.5,
        }
    }
}

impl ImageConfig {
    /// Default configuration with the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self { api_key: Some(api_key.into()), ..Default::default() }
    }
}

/// A generated raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Illustration {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl Illustration {
    /// Encodes the image as a `data:` URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use referent_core::Illustration;
    ///
    /// let image = Illustration { bytes: vec![1, 2, 3], content_type: "image/png".into() };
    /// assert_eq!(image.to_data_url(), "data:image/png;base64,AQID");
    /// ```
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

/// Image-generation backend.
#[async_trait]
pub trait ImageClient: Send + Sync {
    /// Renders an image for a text prompt.
    async fn generate(&self, prompt: &str) -> Result<Illustration>;
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    num_inference_steps: u32,
    guidance_scale: f32,
}

/// [`ImageClient`] for the Hugging Face inference API.
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    http_client: Client,
    config: ImageConfig,
}

impl HuggingFaceClient {
    pub fn new(config: ImageConfig) -> Self {
        Self { http_client: Client::new(), config }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }
}

#[async_trait]
impl ImageClient for HuggingFaceClient {
    async fn generate(&self, prompt: &str) -> Result<Illustration> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ReferentError::Config("HUGGINGFACE_API_KEY is not configured".to_string()))?;

        let body = InferenceRequest {
            inputs: prompt.trim(),
            parameters: InferenceParameters {
                num_inference_steps: self.config.num_inference_steps,
                guidance_scale: self.config.guidance_scale,
            },
        };

        debug!(endpoint = %self.config.endpoint, prompt_length = body.inputs.len(), "requesting illustration");
        let response = self
            .http_client
            .post(&self.config.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ReferentError::Image(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            warn!(status = status.as_u16(), %message, "image generation failed");
            return Err(ReferentError::Image(message));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or("image/png")
            .to_string();
        let bytes = response.bytes().await.map_err(|e| ReferentError::Image(e.to_string()))?;

        Ok(Illustration { bytes: bytes.to_vec(), content_type })
    }
}

/// Pulls the `error` field out of an inference API error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        serde_json::Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}
