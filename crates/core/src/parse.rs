//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and navigating the DOM tree using CSS selectors. Both the digest
//! extractor and the screenshot classifier work exclusively through these
//! wrappers.
//!
//! # Example
//!
//! ```rust
//! use nightly_core::parse::Document;
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

use crate::{NightlyError, Result};

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| NightlyError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Represents a parsed HTML document.
///
/// Parsing is lenient: malformed markup is repaired by the HTML5 tree
/// builder rather than rejected, so a `Document` can be built from any
/// string.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use nightly_core::parse::Document;
    ///
    /// let html = "<html><body><h1>Title</h1></body></html>";
    /// let doc = Document::parse(html).unwrap();
    /// ```
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Parses HTML from raw bytes, replacing invalid UTF-8 sequences.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    /// Gets the raw HTML representation.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Selects elements using a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`NightlyError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use nightly_core::parse::Document;
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

    /// Selects the first element matching a CSS selector.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }

    /// Gets the title of the document.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use nightly_core::parse::Document;
///
/// let html = r#"<a href="https://github.com/user1/repo1">user1/repo1</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "user1/repo1");
/// assert_eq!(link.attr("href"), Some("https://github.com/user1/repo1"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the outer HTML of this element, i.e. its own tag, attributes
    /// and content.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the text content with leading and trailing whitespace removed.
    ///
    /// Non-breaking spaces count as whitespace here, which matters for the
    /// `&nbsp;`-padded counters of the digest page.
    pub fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name (e.g., "div", "a", "img").
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`NightlyError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first descendant matching a CSS selector.
    pub fn select_first(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).next().map(|el| Element { element: el }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Changelog Nightly - 2018-02-08</title>
        </head>
        <body>
            <div class="repository">
                <p class="content">Paragraph 1</p>
                <span title="Total Stars">&nbsp;168</span>
            </div>
            <p class="content">Paragraph 2</p>
            <a href="https://github.com/user1/repo1">user1/repo1</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.title(), Some("Changelog Nightly - 2018-02-08".to_string()));
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_element_attributes() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let link = doc.select_first("a").unwrap().unwrap();

        assert_eq!(link.attr("href"), Some("https://github.com/user1/repo1"));
        assert_eq!(link.tag_name(), "a");
    }

    #[test]
    fn test_scoped_select() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let entry = doc.select_first("div.repository").unwrap().unwrap();

        let inner = entry.select("p").unwrap();
        assert_eq!(inner.len(), 1);
        assert!(entry.select_first("a").unwrap().is_none());
    }

    #[test]
    fn test_trimmed_text_strips_nbsp() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let stars = doc.select_first("span[title*=\"Stars\"]").unwrap().unwrap();

        assert_eq!(stars.trimmed_text(), "168");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(NightlyError::HtmlParseError(_))));
    }

    #[test]
    fn test_outer_html_includes_attributes() {
        let doc = Document::parse(r#"<img src="images/demo.jpg" alt="Demo">"#).unwrap();
        let img = doc.select_first("img").unwrap().unwrap();
        let markup = img.outer_html();

        assert!(markup.starts_with("<img"));
        assert!(markup.contains("images/demo.jpg"));
        assert!(markup.contains("Demo"));
    }
}
