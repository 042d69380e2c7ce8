//! Content fetching from URLs, files, and stdin.
//!
//! A fetch is a single attempt: no retries, one timeout. A non-2xx response
//! and an abandoned request both surface as [`ReferentError::Fetch`], with the
//! timeout case flagged so callers can tell the user the site was too slow.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT};
use tracing::{debug, warn};
use url::Url;

use crate::{ReferentError, Result};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; Referent/0.1)".to_string() }
    }
}

/// Source of raw article HTML.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieves the HTML of a page.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`Fetcher`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(ReferentError::Http)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        fetch_with_client(&self.client, url, &self.config).await
    }
}

/// Fetches HTML content from a URL.
///
/// Performs one HTTP GET that bypasses caches, follows redirects and is
/// abandoned after `config.timeout` seconds.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    HttpFetcher::new(config.clone())?.fetch(url).await
}

async fn fetch_with_client(client: &Client, url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = parse_url(url)?;

    debug!(url = %parsed_url, timeout = config.timeout, "fetching page");
    let response = client
        .get(parsed_url)
        .header(USER_AGENT, &config.user_agent)
        .header(ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .header(CACHE_CONTROL, "no-store")
        .send()
        .await
        .map_err(transport_error)?;

    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "page fetch returned non-success status");
        return Err(ReferentError::Fetch {
            status: Some(status.as_u16()),
            timeout: false,
            message: format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or("")).trim().to_string(),
        });
    }

    response.text().await.map_err(transport_error)
}

fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| ReferentError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ReferentError::InvalidUrl(format!("unsupported scheme: {}", other))),
    }
}

fn transport_error(e: reqwest::Error) -> ReferentError {
    if e.is_timeout() {
        ReferentError::Fetch { status: None, timeout: true, message: "Request timeout".to_string() }
    } else {
        ReferentError::Fetch { status: e.status().map(|s| s.as_u16()), timeout: false, message: e.to_string() }
    }
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(ReferentError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(ReferentError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(ReferentError::from)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("Referent"));
    }

    #[tokio::test]
    async fn test_fetch_url_invalid() {
        let result = fetch_url("not-a-url", &FetchConfig::default()).await;
        assert!(matches!(result, Err(ReferentError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_url_rejects_non_http_scheme() {
        let result = fetch_url("ftp://example.com/file", &FetchConfig::default()).await;
        assert!(matches!(result, Err(ReferentError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(ReferentError::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file_reads_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<html><body>saved page</body></html>").unwrap();

        let html = fetch_file(file.path().to_str().unwrap()).unwrap();
        assert!(html.contains("saved page"));
    }
}
