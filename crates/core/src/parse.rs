//! HTML parsing and DOM queries.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and navigating the parsed tree using CSS selectors. A `Document` is
//! never mutated after parsing; destructive cleanup always happens on a
//! working copy (see [`crate::clean`]).
//!
//! # Example
//!
//! ```rust
//! use referent_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use scraper::{Html, Selector};

use crate::clean::{ExclusionSet, cleaned_text};
use crate::{ReferentError, Result};

/// Represents a parsed HTML document.
///
/// A Document wraps an HTML page and provides methods for querying elements
/// using CSS selectors. Malformed markup never fails to parse; it simply
/// yields fewer matching elements.
///
/// # Example
///
/// ```rust
/// use referent_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html).unwrap();
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use referent_core::parse::Document;
    ///
    /// let doc = Document::parse("<html><body><h1>Title</h1></body></html>").unwrap();
    /// assert!(doc.body().is_some());
    /// ```
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Gets the raw HTML representation.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Selects elements using a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ReferentError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use referent_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector in document order.
    pub fn first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }

    /// Gets the `<body>` element.
    ///
    /// The HTML parser always synthesizes a body, so this is only `None` for
    /// documents that were not produced by [`Document::parse`].
    pub fn body(&'_ self) -> Option<Element<'_>> {
        self.first("body").ok().flatten()
    }

    /// Gets the text of the `<title>` element if present.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ReferentError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use referent_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the raw text content of this element, excluded elements included.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the raw text content with leading and trailing whitespace removed.
    pub fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    /// Gets the text of a working copy of this element with the exclusion set removed.
    ///
    /// The element itself is never matched against the exclusion set, only its
    /// descendants. The returned text is trimmed.
    pub fn cleaned_text(&self, exclusions: &ExclusionSet) -> Result<String> {
        cleaned_text(self, exclusions)
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ReferentError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Counts descendant elements matching a CSS selector.
    pub fn count(&self, selector: &str) -> Result<usize> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).count())
    }
}

/// Number of characters in a text, the unit every length threshold is expressed in.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
