use std::sync::Arc;

use anyhow::{Context, Result};
use referent_core::{
    CompletionClient, Fetcher, HttpFetcher, HuggingFaceClient, ImageClient, OpenRouterClient, Reader,
};

use crate::config::ServerConfig;

/// Shared application state
///
/// Collaborators sit behind trait objects so tests can swap in stubs.
#[derive(Clone)]
pub struct AppState {
    pub reader: Arc<Reader>,
    pub fetcher: Arc<dyn Fetcher>,
    pub completion: Arc<dyn CompletionClient>,
    pub image: Arc<dyn ImageClient>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let reader_config = config.reader_config();
        let fetcher = HttpFetcher::new(reader_config.fetch.clone()).context("Failed to build HTTP client")?;

        Ok(Self {
            reader: Arc::new(Reader::with_config(reader_config)),
            fetcher: Arc::new(fetcher),
            completion: Arc::new(OpenRouterClient::new(config.completion_config())),
            image: Arc::new(HuggingFaceClient::new(config.image_config())),
        })
    }
}
