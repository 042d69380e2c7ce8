//! Article body extraction.
//!
//! Extraction is an ordered cascade of [`Strategy`] steps, each a pure
//! function from a [`Document`] to an optional [`Candidate`]. The first step
//! whose candidate clears its length threshold without carrying a paywall
//! phrase wins; later steps are never consulted.
//!
//! | Step | Strategy | Accepts when cleaned text |
//! |------|----------|---------------------------|
//! | 1 | [`Strategy::SemanticContainer`] | > 200, else > 100 chars |
//! | 2 | [`Strategy::ParagraphAggregation`] | > 80 chars |
//! | 3 | [`Strategy::ContentMarkerDiv`] | > 100 chars |
//! | 4 | [`Strategy::DenseDiv`] | > 100 chars |
//! | 5 | [`Strategy::Body`] | > 150 chars |
//!
//! Every step rejects paywall-flagged candidates.

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::clean::ExclusionSet;
use crate::parse::{Document, Element, char_len};
use crate::paywall::is_paywalled;
use crate::Result;

/// Structural selectors that commonly denote an article body, in priority order.
pub const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "[class*=post]",
    "[class*=content]",
    "[class*=article-content]",
    "[class*=entry-content]",
    "[class*=post-content]",
    "[class*=story-body]",
    "[class*=article-body]",
    "[class*=text-content]",
    "[class*=main-content]",
    "[class*=page-content]",
    "[id*=content]",
    "[id*=article]",
    "[id*=post]",
    "[role=article]",
    "main",
];

/// Divs whose class carries a generic content marker.
pub const CONTENT_MARKER_DIVS: &str = "div[class*='text'], div[class*='story'], div[class*='news'], div[class*='article']";

/// Configuration for content extraction.
///
/// Every length is a character count that a candidate must strictly exceed.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Semantic container accepted outright above this length
    pub selector_primary_chars: usize,
    /// Semantic container accepted under the relaxed rule above this length
    pub selector_relaxed_chars: usize,
    /// Raw paragraph length needed to join the aggregation
    pub paragraph_chars: usize,
    /// Aggregated paragraphs accepted above this length
    pub aggregate_chars: usize,
    /// Raw text a content-marker div needs to be considered
    pub marker_div_raw_chars: usize,
    /// Content-marker div accepted above this length
    pub marker_div_chars: usize,
    /// Raw text a generic div needs to be considered dense
    pub dense_div_raw_chars: usize,
    /// A dense div has more than this many descendant paragraphs...
    pub dense_div_paragraphs: usize,
    /// ...or more than this many long lines
    pub dense_div_lines: usize,
    /// A line counts as long above this length
    pub dense_line_chars: usize,
    /// Dense div accepted above this length
    pub dense_div_chars: usize,
    /// Body fallback accepted above this length
    pub body_chars: usize,
    /// Accepted content shorter than this is treated as an access gate
    pub gate_min_chars: usize,
    /// Accepted content shorter than this carrying a paywall phrase is treated as an access gate
    pub gate_paywall_chars: usize,
    /// Elements stripped from every candidate
    pub exclusions: ExclusionSet,
    /// Whether to fill title and date in the result
    pub extract_metadata: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            selector_primary_chars: 200,
            selector_relaxed_chars: 100,
            paragraph_chars: 30,
            aggregate_chars: 80,
            marker_div_raw_chars: 100,
            marker_div_chars: 100,
            dense_div_raw_chars: 150,
            dense_div_paragraphs: 2,
            dense_div_lines: 3,
            dense_line_chars: 20,
            dense_div_chars: 100,
            body_chars: 150,
            gate_min_chars: 50,
            gate_paywall_chars: 300,
            exclusions: ExclusionSet::default(),
            extract_metadata: true,
        }
    }
}

/// One step of the extraction cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// First match of each [`CONTENT_SELECTORS`] entry
    SemanticContainer,
    /// All substantial `<p>` elements joined by blank lines
    ParagraphAggregation,
    /// Longest div matching [`CONTENT_MARKER_DIVS`]
    ContentMarkerDiv,
    /// Longest div that looks like a dense prose block
    DenseDiv,
    /// The whole body
    Body,
}

/// The cascade, in priority order.
pub const CASCADE: [Strategy; 5] = [
    Strategy::SemanticContainer,
    Strategy::ParagraphAggregation,
    Strategy::ContentMarkerDiv,
    Strategy::DenseDiv,
    Strategy::Body,
];

impl Strategy {
    /// Runs this step alone against a document.
    pub fn run(self, doc: &Document, config: &ExtractConfig) -> Result<Option<Candidate>> {
        match self {
            Strategy::SemanticContainer => semantic_container(doc, config),
            Strategy::ParagraphAggregation => paragraph_aggregation(doc, config),
            Strategy::ContentMarkerDiv => content_marker_div(doc, config),
            Strategy::DenseDiv => dense_div(doc, config),
            Strategy::Body => body(doc, config),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::SemanticContainer => "semantic_container",
            Strategy::ParagraphAggregation => "paragraph_aggregation",
            Strategy::ContentMarkerDiv => "content_marker_div",
            Strategy::DenseDiv => "dense_div",
            Strategy::Body => "body",
        }
    }
}

/// Accepted text from one cascade step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Cleaned, trimmed text
    pub text: String,
    /// Step that produced it
    pub strategy: Strategy,
    /// Matching selector for [`Strategy::SemanticContainer`]
    pub selector: Option<&'static str>,
}

impl Candidate {
    fn new(text: String, strategy: Strategy) -> Self {
        Self { text, strategy, selector: None }
    }
}

/// The result of content extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    /// Best-guess article text; absent when no step accepted a candidate
    pub content: Option<String>,
    /// Document title, when requested
    pub title: Option<String>,
    /// Publication date, when requested
    pub date: Option<String>,
    /// Step that produced the content
    pub strategy: Option<Strategy>,
}

/// Extract the main content from a document
///
/// Runs every [`CASCADE`] step in order and stops at the first accepted
/// candidate. Never fails: a step that cannot run is logged and skipped.
pub fn extract_content(doc: &Document, config: &ExtractConfig) -> ExtractionResult {
    let candidate = CASCADE.iter().find_map(|strategy| match strategy.run(doc, config) {
        Ok(candidate) => candidate.filter(|c| !c.text.is_empty()),
        Err(e) => {
            warn!(strategy = strategy.name(), error = %e, "extraction step failed");
            None
        }
    });

    let mut result = match candidate {
        Some(candidate) => {
            debug!(
                strategy = candidate.strategy.name(),
                selector = candidate.selector.unwrap_or("-"),
                length = char_len(&candidate.text),
                "accepted candidate"
            );
            ExtractionResult { content: Some(candidate.text), strategy: Some(candidate.strategy), ..Default::default() }
        }
        None => {
            debug!("no candidate accepted");
            ExtractionResult::default()
        }
    };

    if config.extract_metadata {
        let metadata = doc.extract_metadata();
        result.title = metadata.title;
        result.date = metadata.date;
    }

    result
}

/// True when the text is long enough and carries no paywall phrase.
fn acceptable(text: &str, min_chars: usize) -> bool {
    char_len(text) > min_chars && !is_paywalled(text)
}

fn semantic_container(doc: &Document, config: &ExtractConfig) -> Result<Option<Candidate>> {
    for &selector in CONTENT_SELECTORS {
        let Some(node) = doc.first(selector)? else {
            continue;
        };
        let text = node.cleaned_text(&config.exclusions)?;
        if text.is_empty() {
            continue;
        }

        if acceptable(&text, config.selector_primary_chars) || acceptable(&text, config.selector_relaxed_chars) {
            return Ok(Some(Candidate { text, strategy: Strategy::SemanticContainer, selector: Some(selector) }));
        }
        trace!(selector, length = char_len(&text), "container rejected");
    }

    Ok(None)
}

fn paragraph_aggregation(doc: &Document, config: &ExtractConfig) -> Result<Option<Candidate>> {
    let mut parts = Vec::new();
    for paragraph in doc.select("p")? {
        if char_len(&paragraph.trimmed_text()) <= config.paragraph_chars {
            continue;
        }
        let text = paragraph.cleaned_text(&config.exclusions)?;
        if !text.is_empty() {
            parts.push(text);
        }
    }

    let combined = parts.join("\n\n").trim().to_string();
    if acceptable(&combined, config.aggregate_chars) {
        return Ok(Some(Candidate::new(combined, Strategy::ParagraphAggregation)));
    }
    Ok(None)
}

fn content_marker_div(doc: &Document, config: &ExtractConfig) -> Result<Option<Candidate>> {
    let divs = doc
        .select(CONTENT_MARKER_DIVS)?
        .into_iter()
        .filter(|div| char_len(&div.trimmed_text()) > config.marker_div_raw_chars);

    accept_longest(divs, config.marker_div_chars, Strategy::ContentMarkerDiv, config)
}

fn dense_div(doc: &Document, config: &ExtractConfig) -> Result<Option<Candidate>> {
    let mut dense = Vec::new();
    for div in doc.select("div")? {
        let raw = div.trimmed_text();
        if char_len(&raw) <= config.dense_div_raw_chars {
            continue;
        }
        let paragraphs = div.count("p")?;
        if paragraphs > config.dense_div_paragraphs || long_lines(&raw, config.dense_line_chars) > config.dense_div_lines
        {
            dense.push(div);
        }
    }

    accept_longest(dense.into_iter(), config.dense_div_chars, Strategy::DenseDiv, config)
}

fn body(doc: &Document, config: &ExtractConfig) -> Result<Option<Candidate>> {
    let Some(body) = doc.body() else {
        return Ok(None);
    };
    let text = body.cleaned_text(&config.exclusions)?;
    if acceptable(&text, config.body_chars) {
        return Ok(Some(Candidate::new(text, Strategy::Body)));
    }
    Ok(None)
}

/// Number of lines whose trimmed length exceeds `min_chars`.
fn long_lines(text: &str, min_chars: usize) -> usize {
    text.split('\n').filter(|line| char_len(line.trim()) > min_chars).count()
}

/// Picks the element with the longest raw text (first wins ties), then cleans and tests it.
fn accept_longest<'a>(
    elements: impl Iterator<Item = Element<'a>>, min_chars: usize, strategy: Strategy, config: &ExtractConfig,
) -> Result<Option<Candidate>> {
    let mut best: Option<(usize, Element<'a>)> = None;
    for element in elements {
        let len = char_len(&element.trimmed_text());
        if best.as_ref().is_none_or(|(best_len, _)| len > *best_len) {
            best = Some((len, element));
        }
    }

    let Some((_, element)) = best else {
        return Ok(None);
    };
    let text = element.cleaned_text(&config.exclusions)?;
    if acceptable(&text, min_chars) {
        return Ok(Some(Candidate::new(text, strategy)));
    }
    Ok(None)
}
