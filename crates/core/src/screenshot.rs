//! Heuristic screenshot selection over README markup.
//!
//! README renderings are full of badges, emoji and logos. The classifier
//! walks the `<img>` elements in document order, skips the noise, remembers
//! the first remaining image as a fallback and stops at the first image
//! whose markup names itself a screenshot, demo, example or sample.
//!
//! The keyword lists below are matched against lowercased markup and are
//! kept literal: fixtures assert exact outcomes for exact strings.

use std::ops::ControlFlow;

use crate::parse::{Document, Element};
use crate::Result;

/// Markers of CI, coverage, dependency and quality badges.
pub const BADGE_MARKERS: &[&str] = &[
    "badge",
    "shields.io",
    "travis-ci.org",
    "coveralls.io",
    "snyk.io",
    "david-dm.org",
    "packagequality.com",
];

/// Markers of emoji and icons.
pub const ICON_MARKERS: &[&str] = &["emoji", "icon"];

/// Markers of project logos.
pub const LOGO_MARKERS: &[&str] = &["logo"];

/// Markers of images that show the project in action.
pub const SCREENSHOT_MARKERS: &[&str] = &["screen", "demo", "example", "sample"];

/// Kinds of images that are never screenshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Noise {
    Badge,
    Icon,
    Logo,
}

fn contains_any(markup: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| markup.contains(m))
}

/// Classifies lowercased image markup as noise, if it is.
pub fn classify_noise(markup: &str) -> Option<Noise> {
    if contains_any(markup, BADGE_MARKERS) {
        Some(Noise::Badge)
    } else if contains_any(markup, ICON_MARKERS) {
        Some(Noise::Icon)
    } else if contains_any(markup, LOGO_MARKERS) {
        Some(Noise::Logo)
    } else {
        None
    }
}

/// Whether lowercased image markup announces a screenshot.
pub fn is_preferred(markup: &str) -> bool {
    contains_any(markup, SCREENSHOT_MARKERS)
}

/// An image as seen by the classifier: its rendered markup and raw `src`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// Full markup of the element (tag and attributes).
    pub markup: String,
    /// The `src` attribute, verbatim; empty when absent.
    pub src: String,
}

impl ImageCandidate {
    pub fn new(markup: impl Into<String>, src: impl Into<String>) -> Self {
        Self { markup: markup.into(), src: src.into() }
    }

    /// Builds a candidate whose markup is a bare `<img src="...">` tag.
    pub fn from_src(src: impl Into<String>) -> Self {
        let src = src.into();
        Self { markup: format!(r#"<img src="{}">"#, src), src }
    }

    pub fn from_element(element: &Element<'_>) -> Self {
        Self { markup: element.outer_html(), src: element.attr("src").unwrap_or_default().to_string() }
    }
}

/// Selection state over a stream of images.
///
/// `Empty` moves to `Fallback` on the first non-noise image and to
/// `Preferred` on the first image announcing a screenshot. `Preferred` is
/// terminal: [`Selection::observe`] returns `Break` and later images are
/// never looked at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Empty,
    Fallback(String),
    Preferred(String),
}

impl Selection {
    /// Feeds one image into the state machine.
    pub fn observe(&mut self, image: &ImageCandidate) -> ControlFlow<()> {
        if matches!(self, Selection::Preferred(_)) {
            return ControlFlow::Break(());
        }

        let markup = image.markup.to_lowercase();
        if classify_noise(&markup).is_some() {
            return ControlFlow::Continue(());
        }

        if is_preferred(&markup) {
            *self = Selection::Preferred(image.src.clone());
            return ControlFlow::Break(());
        }

        if matches!(self, Selection::Empty) {
            *self = Selection::Fallback(image.src.clone());
        }
        ControlFlow::Continue(())
    }

    /// The chosen `src`, preferred over fallback.
    ///
    /// A chosen image without a `src` yields `None`.
    pub fn into_src(self) -> Option<String> {
        match self {
            Selection::Empty => None,
            Selection::Fallback(src) | Selection::Preferred(src) => Some(src).filter(|s| !s.is_empty()),
        }
    }
}

/// Picks the image most likely to be a screenshot from an ordered list.
///
/// Returns the chosen `src` as-is, without URL normalization.
pub fn select_screenshot<'a, I>(images: I) -> Option<String>
where
    I: IntoIterator<Item = &'a ImageCandidate>,
{
    let mut selection = Selection::default();
    for image in images {
        if selection.observe(image).is_break() {
            break;
        }
    }
    selection.into_src()
}

/// Collects every `<img>` of a document, at any depth, in document order.
pub fn image_candidates(doc: &Document) -> Result<Vec<ImageCandidate>> {
    Ok(doc.select("img")?.iter().map(ImageCandidate::from_element).collect())
}

/// Picks a screenshot from a parsed README.
pub fn screenshot_from_document(doc: &Document) -> Result<Option<String>> {
    Ok(select_screenshot(&image_candidates(doc)?))
}

/// Picks a screenshot from README HTML.
///
/// # Example
///
/// ```rust
/// use nightly_core::screenshot_from_html;
///
/// let html = r#"<img src="https://img.shields.io/badge/build-passing.svg"><img src="images/demo.gif">"#;
/// assert_eq!(screenshot_from_html(html).unwrap(), Some("images/demo.gif".to_string()));
/// ```
pub fn screenshot_from_html(html: &str) -> Result<Option<String>> {
    let doc = Document::parse(html)?;
    screenshot_from_document(&doc)
}

/// Whether an image `src` is already absolute.
///
/// Only the literal lowercase `http` prefix counts; anything else is
/// treated as a path relative to the repository root.
pub fn is_absolute_url(src: &str) -> bool {
    src.starts_with("http")
}
