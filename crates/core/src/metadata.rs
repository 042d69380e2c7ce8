use serde::Serialize;

use crate::Document;

/// Optional provenance extracted alongside the article body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub date: Option<String>,
}

/// Meta tags consulted for the publication date, in priority order.
const DATE_META_SELECTORS: &[&str] = &[
    r#"meta[property="article:published_time"]"#,
    r#"meta[name="article:published_time"]"#,
    r#"meta[name="pubdate"]"#,
    r#"meta[name="publish-date"]"#,
    r#"meta[name="date"]"#,
];

impl Document {
    /// Extract title with priority fallback:
    /// 1. Open Graph `og:title`
    /// 2. `<title>` element
    /// 3. First `<h1>` element
    pub fn extract_title(&self) -> Option<String> {
        if let Some(title) = self.meta_content(r#"meta[property="og:title"]"#) {
            return Some(title);
        }

        if let Some(title) = self.title().and_then(non_empty) {
            return Some(title);
        }

        self.first_text("h1")
    }

    /// Extract publication date with priority fallback:
    /// 1. Article/publication meta tags
    /// 2. First `<time>` element (`datetime` attribute, then its text)
    /// 3. First element whose class or id mentions "date"
    pub fn extract_date(&self) -> Option<String> {
        if let Some(date) = DATE_META_SELECTORS.iter().find_map(|selector| self.meta_content(selector)) {
            return Some(date);
        }

        if let Ok(Some(time)) = self.first("time") {
            if let Some(datetime) = time.attr("datetime").and_then(|d| non_empty(d.to_string())) {
                return Some(datetime);
            }
            if let Some(text) = non_empty(time.text()) {
                return Some(text);
            }
        }

        self.first_text("[class*=date], [id*=date]")
    }

    /// Extract all metadata from the document.
    pub fn extract_metadata(&self) -> Metadata {
        Metadata { title: self.extract_title(), date: self.extract_date() }
    }

    fn meta_content(&self, selector: &str) -> Option<String> {
        let element = self.first(selector).ok().flatten()?;
        element.attr("content").and_then(|c| non_empty(c.to_string()))
    }

    fn first_text(&self, selector: &str) -> Option<String> {
        let element = self.first(selector).ok().flatten()?;
        non_empty(element.text())
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}
