//! Main content extraction API.
//!
//! The [`Reader`] ties the pieces together: it parses HTML into a throwaway
//! [`Document`], runs the extraction cascade, applies the outcome gate and
//! collects page metadata. Convenience functions [`extract`] and
//! [`fetch_and_extract`] cover the one-liner cases.
//!
//! # Example
//!
//! ```rust
//! use referent_core::reader::extract;
//!
//! let html = "<html><body><article>Short.</article></body></html>";
//! let extraction = extract(html).unwrap();
//! assert!(!extraction.outcome.is_success());
//! ```

use serde::Serialize;
use tracing::{info, trace};

use crate::extract::{ExtractConfig, Strategy, extract_content};
use crate::metadata::Metadata;
use crate::outcome::{ExtractionOutcome, classify};
use crate::parse::{Document, char_len};
use crate::Result;

#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, Fetcher, HttpFetcher};

/// Configuration for the [`Reader`].
///
/// # Example
///
/// ```rust
/// use referent_core::ReaderConfig;
///
/// let config = ReaderConfig::builder()
///     .body_chars(200)
///     .extract_metadata(false)
///     .build();
/// assert_eq!(config.extract.body_chars, 200);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Cascade thresholds and exclusions.
    pub extract: ExtractConfig,
    /// HTTP settings for [`Reader::fetch_and_extract`].
    #[cfg(feature = "fetch")]
    pub fetch: FetchConfig,
}

impl ReaderConfig {
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::new()
    }
}

/// Builder for [`ReaderConfig`].
#[derive(Debug, Default)]
pub struct ReaderConfigBuilder {
    config: ReaderConfig,
}

impl ReaderConfigBuilder {
    pub fn new() -> Self {
        Self { config: ReaderConfig::default() }
    }

    /// Replaces the whole extraction configuration.
    pub fn extract(mut self, value: ExtractConfig) -> Self {
        self.config.extract = value;
        self
    }

    /// Sets the minimum length a `<body>` fallback must exceed.
    pub fn body_chars(mut self, value: usize) -> Self {
        self.config.extract.body_chars = value;
        self
    }

    /// Sets whether title and date are collected.
    pub fn extract_metadata(mut self, value: bool) -> Self {
        self.config.extract.extract_metadata = value;
        self
    }

    /// Sets the HTTP request timeout in seconds.
    #[cfg(feature = "fetch")]
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    /// Sets the User-Agent sent when fetching pages.
    #[cfg(feature = "fetch")]
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    pub fn build(self) -> ReaderConfig {
        self.config
    }
}

/// Everything a caller learns from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub outcome: ExtractionOutcome,
    pub metadata: Metadata,
    /// Cascade step that produced the content, if any.
    pub strategy: Option<Strategy>,
    pub source_url: Option<String>,
}

impl Extraction {
    pub fn content(&self) -> Option<&str> {
        self.outcome.content()
    }
}

/// Main entry point for content extraction.
///
/// # Example
///
/// ```rust
/// use referent_core::Reader;
///
/// let body = "The council met on Tuesday evening to discuss the river crossing. ".repeat(5);
/// let html = format!("<html><head><title>Council</title></head><body><article>{}</article></body></html>", body);
///
/// let extraction = Reader::new().extract_html(&html).unwrap();
/// assert_eq!(extraction.content(), Some(body.trim()));
/// assert_eq!(extraction.metadata.title.as_deref(), Some("Council"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Reader {
    config: ReaderConfig,
}

impl Reader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Extracts the article from an HTML string.
    ///
    /// Content failures are reported through [`Extraction::outcome`]; `Err` is
    /// only returned for invalid configuration.
    pub fn extract_html(&self, html: &str) -> Result<Extraction> {
        self.extract_from(html, None)
    }

    /// Like [`Reader::extract_html`], recording where the page came from.
    pub fn extract_html_with_url(&self, html: &str, url: &str) -> Result<Extraction> {
        self.extract_from(html, Some(url))
    }

    /// Fetches a page with the configured [`HttpFetcher`] and extracts it.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_extract(&self, url: &str) -> Result<Extraction> {
        let fetcher = HttpFetcher::new(self.config.fetch.clone())?;
        self.fetch_and_extract_with(&fetcher, url).await
    }

    /// Fetches a page with any [`Fetcher`] and extracts it.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_extract_with(&self, fetcher: &dyn Fetcher, url: &str) -> Result<Extraction> {
        let html = fetcher.fetch(url).await?;
        self.extract_html_with_url(&html, url)
    }

    fn extract_from(&self, html: &str, url: Option<&str>) -> Result<Extraction> {
        let doc = Document::parse(html)?;
        let config = &self.config.extract;

        let result = extract_content(&doc, config);
        let outcome = classify(&result, &doc, config);

        match outcome.content() {
            Some(content) => {
                info!(length = char_len(content), strategy = ?result.strategy, "extracted content");
                trace!(preview = %content.chars().take(200).collect::<String>(), "content preview");
            }
            None => info!(reason = ?outcome.failure_reason(), "no usable content"),
        }

        Ok(Extraction {
            outcome,
            metadata: Metadata { title: result.title, date: result.date },
            strategy: result.strategy,
            source_url: url.map(str::to_string),
        })
    }
}

/// Convenience function for one-liner extraction with defaults.
pub fn extract(html: &str) -> Result<Extraction> {
    Reader::new().extract_html(html)
}

/// Convenience function: fetch and extract from a URL with defaults.
///
/// # Example
///
/// ```no_run
/// use referent_core::fetch_and_extract;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let extraction = fetch_and_extract("https://example.com/article").await?;
///     println!("{:?}", extraction.content());
///     Ok(())
/// }
/// ```
#[cfg(feature = "fetch")]
pub async fn fetch_and_extract(url: &str) -> Result<Extraction> {
    Reader::new().fetch_and_extract(url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureReason;

    const ARTICLE_HTML: &str = r##"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <title>Bridge Vote</title>
            <meta property="article:published_time" content="2024-03-05">
        </head>
        <body>
            <nav>Home | World | Sport</nav>
            <article>
                The council met on Tuesday evening to discuss the river crossing and its funding.
                Residents filled the chamber and several spoke about traffic on the old bridge.
                After two hours of debate the motion to commission a survey passed by seven votes.
            </article>
        </body>
        </html>
    "##;

    #[test]
    fn test_reader_config_builder() {
        let config = ReaderConfig::builder().body_chars(10).extract_metadata(false).build();
        assert_eq!(config.extract.body_chars, 10);
        assert!(!config.extract.extract_metadata);
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_reader_config_fetch_settings() {
        let config = ReaderConfig::builder().timeout(5).user_agent("probe/1.0").build();
        assert_eq!(config.fetch.timeout, 5);
        assert_eq!(config.fetch.user_agent, "probe/1.0");
    }

    #[test]
    fn test_extract_article_with_metadata() {
        let extraction = Reader::new().extract_html(ARTICLE_HTML).unwrap();
        let content = extraction.content().unwrap();

        assert!(content.starts_with("The council met"));
        assert!(!content.contains("Sport"));
        assert_eq!(extraction.strategy, Some(Strategy::SemanticContainer));
        assert_eq!(extraction.metadata.title.as_deref(), Some("Bridge Vote"));
        assert_eq!(extraction.metadata.date.as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_extract_with_url_records_source() {
        let extraction = Reader::new().extract_html_with_url(ARTICLE_HTML, "https://example.com/bridge").unwrap();
        assert_eq!(extraction.source_url.as_deref(), Some("https://example.com/bridge"));
    }

    #[test]
    fn test_extract_empty_page() {
        let extraction = extract("<html><body></body></html>").unwrap();
        assert_eq!(extraction.outcome.failure_reason(), Some(FailureReason::NotFound));
        assert_eq!(extraction.strategy, None);
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_and_extract_invalid_url() {
        let result = fetch_and_extract("not-a-url").await;
        assert!(matches!(result, Err(crate::ReferentError::InvalidUrl(_))));
    }
}
