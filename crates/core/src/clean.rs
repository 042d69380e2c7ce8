//! Exclusion-set stripping on working copies of a subtree.
//!
//! Navigation, page chrome, ads, social widgets and scripts are removed from a
//! *copy* of a candidate subtree before its text is measured. The copy is the
//! serialized inner HTML of the candidate, rewritten with `lol_html` and parsed
//! again as a fragment; the source [`Document`](crate::Document) is never touched.

use std::str::FromStr;

use scraper::Html;

use crate::parse::Element;
use crate::{ReferentError, Result};

/// Selectors for elements that never count as article text.
pub const EXCLUDED_SELECTORS: &[&str] = &[
    "nav",
    "header",
    "footer",
    "aside",
    "[class*=nav]",
    "[class*=menu]",
    "[class*=sidebar]",
    "[class*=header]",
    "[class*=footer]",
    "[class*=ad]",
    "[class*=advertisement]",
    "[class*=widget]",
    "[class*=social]",
    "[class*=share]",
    "[class*=comment]",
    "script",
    "style",
    "noscript",
];

/// An ordered, pre-validated list of selectors stripped from every candidate.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    selectors: Vec<String>,
}

impl ExclusionSet {
    /// Creates an exclusion set from custom selectors.
    ///
    /// # Errors
    ///
    /// Returns [`ReferentError::HtmlParseError`] if a selector is not supported
    /// by the rewriter.
    pub fn new<I, S>(selectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selectors: Vec<String> = selectors.into_iter().map(Into::into).collect();
        for selector in &selectors {
            lol_html::Selector::from_str(selector).map_err(|e| {
                ReferentError::HtmlParseError(format!("Invalid exclusion selector {}: {}", selector, e))
            })?;
        }
        Ok(Self { selectors })
    }

    /// The selectors in this set.
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self { selectors: EXCLUDED_SELECTORS.iter().map(|s| s.to_string()).collect() }
    }
}

/// Removes every element matching the exclusion set from an HTML fragment.
///
/// Returns the rewritten copy; the input is left untouched.
pub fn strip_excluded(html: &str, exclusions: &ExclusionSet) -> Result<String> {
    if !html.contains('<') || exclusions.selectors.is_empty() {
        return Ok(html.to_string());
    }

    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: exclusions
                .selectors
                .iter()
                .map(|selector| {
                    lol_html::element!(selector.as_str(), |el| {
                        el.remove();
                        Ok(())
                    })
                })
                .collect(),
            strict: false,
            ..Default::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| ReferentError::HtmlParseError(e.to_string()))?;
    rewriter.end().map_err(|e| ReferentError::HtmlParseError(e.to_string()))?;

    Ok(String::from_utf8_lossy(&output).into_owned())
}

/// Trimmed text of an element after stripping the exclusion set from a copy of its contents.
pub fn cleaned_text(element: &Element<'_>, exclusions: &ExclusionSet) -> Result<String> {
    let stripped = strip_excluded(&element.inner_html(), exclusions)?;
    let fragment = Html::parse_fragment(&stripped);
    let text: String = fragment.root_element().text().collect();
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;

    #[test]
    fn test_default_set_matches_listed_selectors() {
        let set = ExclusionSet::default();
        assert_eq!(set.selectors().len(), EXCLUDED_SELECTORS.len());
        assert_eq!(set.selectors()[0], "nav");
        assert_eq!(set.selectors().last().map(String::as_str), Some("noscript"));
    }

    #[test]
    fn test_invalid_exclusion_selector() {
        let result = ExclusionSet::new(["[[broken"]);
        assert!(matches!(result, Err(ReferentError::HtmlParseError(_))));
    }

    #[test]
    fn test_strip_removes_structural_and_class_matches() {
        let html = r#"<nav>Menu</nav><p>Keep me</p><div class="share-buttons">Share</div><script>var x = 1;</script>"#;
        let stripped = strip_excluded(html, &ExclusionSet::default()).unwrap();

        assert!(stripped.contains("Keep me"));
        assert!(!stripped.contains("Menu"));
        assert!(!stripped.contains("Share"));
        assert!(!stripped.contains("var x"));
    }

    #[test]
    fn test_strip_tolerates_ambiguous_markup() {
        let html = "<p>Keep me</p><select><template><style>x</style></template></select><nav>Menu</nav>";
        let stripped = strip_excluded(html, &ExclusionSet::default()).unwrap();

        assert!(stripped.contains("Keep me"));
        assert!(!stripped.contains("Menu"));
    }

    #[test]
    fn test_plain_text_passes_through() {
        let stripped = strip_excluded("no markup here", &ExclusionSet::default()).unwrap();
        assert_eq!(stripped, "no markup here");
    }

    #[test]
    fn test_cleaned_text_does_not_mutate_document() {
        let html = r#"<html><body><article><p>Story text.</p><aside>Related links</aside></article></body></html>"#;
        let doc = Document::parse(html).unwrap();
        let article = doc.first("article").unwrap().unwrap();

        let cleaned = article.cleaned_text(&ExclusionSet::default()).unwrap();
        assert_eq!(cleaned, "Story text.");

        let again = doc.first("article").unwrap().unwrap();
        assert!(again.text().contains("Related links"));
    }

    #[test]
    fn test_root_is_not_matched() {
        let html = r#"<html><body><div class="page-header-wrap"><p>Body copy inside a wrapper.</p></div></body></html>"#;
        let doc = Document::parse(html).unwrap();
        let wrapper = doc.first("div").unwrap().unwrap();

        let cleaned = wrapper.cleaned_text(&ExclusionSet::default()).unwrap();
        assert_eq!(cleaned, "Body copy inside a wrapper.");
    }

    #[test]
    fn test_cleaned_text_preserves_unicode() {
        let html = "<html><body><div><p>Привет, мир — ça va?</p><footer>©</footer></div></body></html>";
        let doc = Document::parse(html).unwrap();
        let div = doc.first("div").unwrap().unwrap();

        assert_eq!(div.cleaned_text(&ExclusionSet::default()).unwrap(), "Привет, мир — ça va?");
    }
}
