//! Caller-facing classification of an extraction.
//!
//! The cascade only answers "which text, if any". Callers need more: a page
//! whose best candidate is a handful of characters, or a short text that
//! mentions subscribing, is far more likely an access gate than an article.
//! [`classify`] turns an [`ExtractionResult`] into an [`ExtractionOutcome`]
//! that keeps "nothing found" apart from "likely paywalled".

use serde::Serialize;
use tracing::debug;

use crate::extract::{ExtractConfig, ExtractionResult};
use crate::parse::{Document, char_len};
use crate::paywall::is_paywalled;

/// Why an extraction did not produce usable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No cascade step accepted a candidate.
    NotFound,
    /// A candidate was accepted but is too short to be an article.
    TooShort,
    /// The page or the accepted candidate reads like a login or subscription gate.
    Paywalled,
}

impl FailureReason {
    /// HTTP status a route handler answers with for this reason.
    pub fn status(self) -> u16 {
        match self {
            FailureReason::NotFound => 400,
            FailureReason::TooShort | FailureReason::Paywalled => 403,
        }
    }

    /// Whether the reason collapses to the outward "access gated" classification.
    pub fn is_access_gated(self) -> bool {
        matches!(self, FailureReason::TooShort | FailureReason::Paywalled)
    }

    /// User-facing description that leaks no extraction internals.
    pub fn message(self) -> &'static str {
        match self {
            FailureReason::NotFound => "Could not extract content from the article",
            FailureReason::TooShort | FailureReason::Paywalled => {
                "Could not extract article content. The article may be behind a paywall or require login."
            }
        }
    }
}

/// The externally meaningful result of extracting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    Success { content: String },
    Failure { reason: FailureReason, status: Option<u16> },
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Success { .. })
    }

    /// The extracted text of a success.
    pub fn content(&self) -> Option<&str> {
        match self {
            ExtractionOutcome::Success { content } => Some(content),
            ExtractionOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            ExtractionOutcome::Success { .. } => None,
            ExtractionOutcome::Failure { reason, .. } => Some(*reason),
        }
    }

    /// 200 for a success, otherwise the carried status or the reason's default.
    pub fn http_status(&self) -> u16 {
        match self {
            ExtractionOutcome::Success { .. } => 200,
            ExtractionOutcome::Failure { reason, status } => status.unwrap_or_else(|| reason.status()),
        }
    }

    fn gated(reason: FailureReason) -> Self {
        ExtractionOutcome::Failure { reason, status: Some(reason.status()) }
    }
}

/// Applies the post-extraction gate.
///
/// - accepted content shorter than `gate_min_chars` is [`FailureReason::TooShort`] (403);
/// - accepted content shorter than `gate_paywall_chars` with a paywall phrase is
///   [`FailureReason::Paywalled`] (403);
/// - any other accepted content is a success;
/// - with no content, a page whose cleaned body text carries a paywall phrase is
///   [`FailureReason::Paywalled`] (403), anything else [`FailureReason::NotFound`].
pub fn classify(result: &ExtractionResult, doc: &Document, config: &ExtractConfig) -> ExtractionOutcome {
    let Some(content) = result.content.as_deref() else {
        return classify_missing(doc, config);
    };

    let length = char_len(content);
    if length < config.gate_min_chars {
        debug!(length, "accepted content too short, treating as access gate");
        return ExtractionOutcome::gated(FailureReason::TooShort);
    }
    if length < config.gate_paywall_chars && is_paywalled(content) {
        debug!(length, "short content carries paywall phrase");
        return ExtractionOutcome::gated(FailureReason::Paywalled);
    }

    ExtractionOutcome::Success { content: content.to_string() }
}

fn classify_missing(doc: &Document, config: &ExtractConfig) -> ExtractionOutcome {
    let gate_text = doc
        .body()
        .and_then(|body| body.cleaned_text(&config.exclusions).ok())
        .unwrap_or_default();

    if !gate_text.is_empty() && is_paywalled(&gate_text) {
        debug!(length = char_len(&gate_text), "no content and page reads like an access gate");
        return ExtractionOutcome::gated(FailureReason::Paywalled);
    }

    ExtractionOutcome::Failure { reason: FailureReason::NotFound, status: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn result_with(content: &str) -> ExtractionResult {
        ExtractionResult { content: Some(content.to_string()), ..Default::default() }
    }

    fn empty_doc() -> Document {
        Document::parse("<html><body></body></html>").unwrap()
    }

    #[rstest]
    #[case(49, false)]
    #[case(50, true)]
    fn test_min_length_boundary(#[case] len: usize, #[case] success: bool) {
        let outcome = classify(&result_with(&"x".repeat(len)), &empty_doc(), &ExtractConfig::default());
        assert_eq!(outcome.is_success(), success);
        if !success {
            assert_eq!(outcome.failure_reason(), Some(FailureReason::TooShort));
            assert_eq!(outcome.http_status(), 403);
        }
    }

    #[rstest]
    #[case(299, false)]
    #[case(300, true)]
    fn test_paywall_window_boundary(#[case] len: usize, #[case] success: bool) {
        let mut text = String::from("subscribe ");
        text.push_str(&"y".repeat(len - text.len()));

        let outcome = classify(&result_with(&text), &empty_doc(), &ExtractConfig::default());
        assert_eq!(outcome.is_success(), success);
        if !success {
            assert_eq!(outcome.failure_reason(), Some(FailureReason::Paywalled));
        }
    }

    #[test]
    fn test_short_clean_content_succeeds() {
        let text = "z".repeat(120);
        let outcome = classify(&result_with(&text), &empty_doc(), &ExtractConfig::default());
        assert_eq!(outcome.content(), Some(text.as_str()));
        assert_eq!(outcome.http_status(), 200);
    }

    #[test]
    fn test_missing_content_is_not_found() {
        let outcome = classify(&ExtractionResult::default(), &empty_doc(), &ExtractConfig::default());
        assert_eq!(outcome, ExtractionOutcome::Failure { reason: FailureReason::NotFound, status: None });
        assert_eq!(outcome.http_status(), 400);
    }

    #[test]
    fn test_missing_content_on_gate_page_is_paywalled() {
        let doc = Document::parse("<html><body><p>Members only. Please log in.</p></body></html>").unwrap();
        let outcome = classify(&ExtractionResult::default(), &doc, &ExtractConfig::default());
        assert_eq!(outcome.failure_reason(), Some(FailureReason::Paywalled));
        assert_eq!(outcome.http_status(), 403);
    }

    #[test]
    fn test_gate_phrase_inside_excluded_chrome_is_ignored() {
        let doc = Document::parse("<html><body><nav>Login</nav><p>Hi</p></body></html>").unwrap();
        let outcome = classify(&ExtractionResult::default(), &doc, &ExtractConfig::default());
        assert_eq!(outcome.failure_reason(), Some(FailureReason::NotFound));
    }

    #[test]
    fn test_reason_statuses() {
        assert_eq!(FailureReason::NotFound.status(), 400);
        assert_eq!(FailureReason::TooShort.status(), 403);
        assert_eq!(FailureReason::Paywalled.status(), 403);
        assert!(FailureReason::TooShort.is_access_gated());
        assert!(FailureReason::Paywalled.is_access_gated());
        assert!(!FailureReason::NotFound.is_access_gated());
        assert!(!FailureReason::NotFound.message().contains("selector"));
    }
}
