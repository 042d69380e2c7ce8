//! Error types for Referent operations.
//!
//! This module defines the main error type [`ReferentError`]. Note that a page
//! without a usable article body is *not* an error: extraction always yields an
//! [`ExtractionOutcome`](crate::ExtractionOutcome). Errors are reserved for the
//! collaborators around the extractor (fetching, the completion backend, the
//! image backend) and for misuse such as invalid selectors.
//!
//! # Example
//!
//! ```rust
//! use referent_core::{ReferentError, Result};
//!
//! fn require_key(key: Option<&str>) -> Result<&str> {
//!     key.ok_or_else(|| ReferentError::Config("OPENROUTER_API_KEY is not configured".to_string()))
//! }
//!
//! assert!(require_key(None).is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Referent.
///
/// # Example
///
/// ```rust
/// use referent_core::ReferentError;
///
/// let err = ReferentError::Fetch { status: Some(404), timeout: false, message: "Not Found".into() };
/// assert_eq!(err.status_code(), Some(404));
/// assert!(!err.is_timeout());
/// ```
#[derive(Error, Debug)]
pub enum ReferentError {
    /// Low-level HTTP client errors from reqwest (client construction, body decoding).
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The article page could not be retrieved.
    ///
    /// `status` carries the upstream HTTP status for non-2xx responses and
    /// `timeout` is set when the request was abandoned after the fetch timeout.
    #[error("Failed to fetch page: {message}")]
    Fetch { status: Option<u16>, timeout: bool, message: String },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid CSS selector or otherwise unusable markup query.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Missing or invalid configuration, typically an absent API key.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The completion backend rejected the request.
    #[error("Completion request failed: {0}")]
    Completion(String),

    /// The completion backend refused the request for credit or token budget reasons.
    #[error("Completion backend token or credit limit reached")]
    TokenLimit,

    /// The completion backend answered without any generated text.
    #[error("No response received from the completion backend")]
    EmptyCompletion,

    /// The image backend rejected the request.
    #[error("Image generation failed: {0}")]
    Image(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Standard I/O errors (reading files or stdin).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReferentError {
    /// Upstream HTTP status of a fetch failure, if there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ReferentError::Fetch { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether this is a fetch that was abandoned after the timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ReferentError::Fetch { timeout: true, .. })
    }
}

/// Result type alias for ReferentError.
pub type Result<T> = std::result::Result<T, ReferentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReferentError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_fetch_error_accessors() {
        let err = ReferentError::Fetch { status: Some(503), timeout: false, message: "503 Service Unavailable".into() };
        assert_eq!(err.status_code(), Some(503));
        assert!(!err.is_timeout());
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_timeout_error() {
        let err = ReferentError::Fetch { status: None, timeout: true, message: "Request timeout".into() };
        assert!(err.is_timeout());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_non_fetch_errors_have_no_status() {
        assert_eq!(ReferentError::TokenLimit.status_code(), None);
        assert!(!ReferentError::EmptyCompletion.is_timeout());
    }
}
