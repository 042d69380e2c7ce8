use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use referent_core::{CompletionConfig, FetchConfig, ImageConfig, ReaderConfig};

/// Server configuration loaded from environment variables.
///
/// This is the only place the process environment is read. API keys are
/// optional: without them the server still starts, and the routes that need
/// them answer with `API_CONFIG_ERROR`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub openrouter_api_key: Option<String>,
    pub huggingface_api_key: Option<String>,
    /// Public URL of the app, sent to OpenRouter as the referer.
    pub app_url: Option<String>,
    pub fetch_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            openrouter_api_key: None,
            huggingface_api_key: None,
            app_url: None,
            fetch_timeout: FetchConfig::default().timeout,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            bind: match env::var("REFERENT_BIND") {
                Ok(bind) => bind.parse().context("REFERENT_BIND must be a socket address like 0.0.0.0:3000")?,
                Err(_) => defaults.bind,
            },
            openrouter_api_key: non_empty_var("OPENROUTER_API_KEY"),
            huggingface_api_key: non_empty_var("HUGGINGFACE_API_KEY"),
            app_url: non_empty_var("REFERENT_APP_URL"),
            fetch_timeout: match env::var("REFERENT_FETCH_TIMEOUT") {
                Ok(secs) => secs.parse().context("REFERENT_FETCH_TIMEOUT must be a number of seconds")?,
                Err(_) => defaults.fetch_timeout,
            },
        })
    }

    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::builder().timeout(self.fetch_timeout).build()
    }

    pub fn completion_config(&self) -> CompletionConfig {
        let mut config = CompletionConfig { api_key: self.openrouter_api_key.clone(), ..Default::default() };
        if let Some(app_url) = &self.app_url {
            config.referer = app_url.clone();
        }
        config
    }

    pub fn image_config(&self) -> ImageConfig {
        ImageConfig { api_key: self.huggingface_api_key.clone(), ..Default::default() }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.fetch_timeout, 30);
        assert!(config.openrouter_api_key.is_none());
    }

    #[test]
    fn test_client_configs_carry_keys() {
        let config = ServerConfig {
            openrouter_api_key: Some("or-key".into()),
            huggingface_api_key: Some("hf-key".into()),
            app_url: Some("https://referent.example".into()),
            ..Default::default()
        };

        let completion = config.completion_config();
        assert_eq!(completion.api_key.as_deref(), Some("or-key"));
        assert_eq!(completion.referer, "https://referent.example");
        assert_eq!(config.image_config().api_key.as_deref(), Some("hf-key"));
        assert_eq!(config.reader_config().fetch.timeout, 30);
    }
}
