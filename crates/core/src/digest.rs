//! Structured extraction of the nightly digest page.
//!
//! The digest lists trending repositories in three tables, one per
//! [`Category`]. Every `div.repository` container inside a table is one
//! entry; an entry yields a [`Repository`] only when its "about" row carries
//! a link. Anything else missing from an entry degrades to an empty field.

use tracing::{debug, info};

use crate::parse::{Document, Element};
use crate::repository::{Category, Repository, TrendingRepos};
use crate::Result;

const ABOUT_LINK: &str = "tr.about a";
const ABOUT_PARAGRAPH: &str = "tr.about p";
const STARS_LABEL: &str = r#"span[title*="Stars"]"#;
const LANGUAGE_LINK: &str = r#"span[title*="Language"] a"#;

/// Why an entry container produced no repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No anchor inside an "about" row (or no "about" row at all).
    MissingAnchor,
    /// The anchor has no `href`, or an empty one.
    MissingUrl,
    /// The anchor has no visible text.
    MissingName,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingAnchor => f.write_str("could not determine repository URL and name"),
            SkipReason::MissingUrl => f.write_str("repository link has no URL"),
            SkipReason::MissingName => f.write_str("repository link has no name"),
        }
    }
}

/// Result of extracting a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Extracted(Repository),
    Skipped(SkipReason),
}

/// Repositories extracted from one category table, plus what was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryReport {
    pub repositories: Vec<Repository>,
    pub skipped: Vec<SkipReason>,
}

impl CategoryReport {
    /// Number of entry containers found in the table.
    pub fn entries(&self) -> usize {
        self.repositories.len() + self.skipped.len()
    }
}

/// Outcome of extracting a whole digest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestReport {
    pub trending: TrendingRepos,
    /// Skipped entries per category, in [`Category::ALL`] order.
    pub skipped: Vec<(Category, SkipReason)>,
}

impl DigestReport {
    pub fn skipped_in(&self, category: Category) -> usize {
        self.skipped.iter().filter(|(c, _)| *c == category).count()
    }
}

// Selectors are constants, so a lookup can only fail on a programming error;
// treat that the same as "not found".
fn first<'a>(entry: &Element<'a>, selector: &str) -> Option<Element<'a>> {
    entry.select_first(selector).ok().flatten()
}

/// Parses a star counter, treating anything that is not a plain
/// non-negative integer as zero.
fn parse_stars(text: &str) -> u64 {
    text.trim().parse().unwrap_or(0)
}

/// Extracts one repository from an entry container.
pub fn extract_entry(entry: &Element<'_>) -> EntryOutcome {
    let Some(anchor) = first(entry, ABOUT_LINK) else {
        return EntryOutcome::Skipped(SkipReason::MissingAnchor);
    };

    let url = anchor.attr("href").unwrap_or_default().to_string();
    if url.is_empty() {
        return EntryOutcome::Skipped(SkipReason::MissingUrl);
    }

    let name = anchor.trimmed_text();
    if name.is_empty() {
        return EntryOutcome::Skipped(SkipReason::MissingName);
    }

    let description = first(entry, ABOUT_PARAGRAPH)
        .map(|p| p.trimmed_text())
        .unwrap_or_default();
    let stars = first(entry, STARS_LABEL)
        .map(|s| parse_stars(&s.text()))
        .unwrap_or(0);
    let language = first(entry, LANGUAGE_LINK)
        .map(|l| l.trimmed_text())
        .unwrap_or_default();

    EntryOutcome::Extracted(Repository { name, url, description, stars, language, screenshot: None })
}

/// Extracts every entry of one category table, in document order.
///
/// A missing table yields an empty report.
pub fn extract_category(doc: &Document, category: Category) -> Result<CategoryReport> {
    let selector = format!("table#{} div.repository", category.table_id());
    let mut report = CategoryReport::default();

    for entry in doc.select(&selector)? {
        match extract_entry(&entry) {
            EntryOutcome::Extracted(repo) => report.repositories.push(repo),
            EntryOutcome::Skipped(reason) => {
                debug!(%category, %reason, "skipping digest entry");
                report.skipped.push(reason);
            }
        }
    }

    Ok(report)
}

/// Extracts all three categories from a parsed digest.
pub fn extract_digest(doc: &Document) -> Result<DigestReport> {
    let mut report = DigestReport::default();

    for category in Category::ALL {
        let CategoryReport { repositories, skipped } = extract_category(doc, category)?;
        *report.trending.category_mut(category) = repositories;
        report.skipped.extend(skipped.into_iter().map(|reason| (category, reason)));
    }

    info!("Found {} repositories", report.trending.total());

    Ok(report)
}

/// Parses digest HTML straight into the trending aggregate.
///
/// # Example
///
/// ```rust
/// use nightly_core::parse_digest;
///
/// let html = r#"<table id="top-new"><tr><td>
///   <div class="repository"><table><tr class="about"><td>
///     <a href="https://github.com/user3/repo3">user3/repo3</a>
///   </td></tr></table></div>
/// </td></tr></table>"#;
///
/// let trending = parse_digest(html).unwrap();
/// assert_eq!(trending.new[0].name, "user3/repo3");
/// assert!(trending.first.is_empty());
/// ```
pub fn parse_digest(html: &str) -> Result<TrendingRepos> {
    let doc = Document::parse(html)?;
    Ok(extract_digest(&doc)?.trending)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_html(body: &str) -> String {
        format!(
            r#"<html><body><table id="top-all-firsts"><tr><td>
               <div class="repositories">
                 <div class="repository">{}</div>
               </div>
               </td></tr></table></body></html>"#,
            body
        )
    }

    fn single(body: &str) -> EntryOutcome {
        let html = entry_html(body);
        let doc = Document::parse(&html).unwrap();
        let entry = doc.select_first("div.repository").unwrap().unwrap();
        extract_entry(&entry)
    }

    #[test]
    fn test_full_entry() {
        let outcome = single(
            r#"<table>
                 <tr class="stats"><td><p>
                   <span title="Total Stars"><img alt="Star" src="/images/star.png" />&nbsp;168</span>
                   <span title="New Stars"><img alt="Up" src="/images/up.png" />&nbsp;90</span>
                   <span title="Language"><a href="https://github.com/trending/c"><span class="dot"></span>C</a></span>
                 </p></td></tr>
                 <tr class="about"><td>
                   <h3><a href="https://github.com/user1/repo1">user1/repo1</a></h3>
                   <p>
                     A non existing C library.
                   </p>
                 </td></tr>
               </table>"#,
        );

        let EntryOutcome::Extracted(repo) = outcome else { panic!("expected repository, got {:?}", outcome) };
        assert_eq!(repo.name, "user1/repo1");
        assert_eq!(repo.url, "https://github.com/user1/repo1");
        assert_eq!(repo.description, "A non existing C library.");
        assert_eq!(repo.stars, 168);
        assert_eq!(repo.language, "C");
        assert_eq!(repo.screenshot, None);
    }

    #[test]
    fn test_missing_about_row_is_skipped() {
        assert_eq!(single("Should be ignored"), EntryOutcome::Skipped(SkipReason::MissingAnchor));
    }

    #[test]
    fn test_anchor_outside_about_row_is_skipped() {
        let outcome = single(
            r#"<table><tr class="stats"><td><a href="https://github.com/user1">user1</a></td></tr></table>"#,
        );
        assert_eq!(outcome, EntryOutcome::Skipped(SkipReason::MissingAnchor));
    }

    #[test]
    fn test_empty_href_is_skipped() {
        let outcome = single(r#"<table><tr class="about"><td><a>user1/repo1</a></td></tr></table>"#);
        assert_eq!(outcome, EntryOutcome::Skipped(SkipReason::MissingUrl));
    }

    #[test]
    fn test_empty_name_is_skipped() {
        let outcome = single(r#"<table><tr class="about"><td><a href="https://github.com/u/r"> </a></td></tr></table>"#);
        assert_eq!(outcome, EntryOutcome::Skipped(SkipReason::MissingName));
    }

    #[test]
    fn test_non_numeric_stars_default_to_zero() {
        for stars in ["1.2k", "lots", "-5", ""] {
            let outcome = single(&format!(
                r#"<table>
                     <tr class="stats"><td><span title="Total Stars">{}</span></td></tr>
                     <tr class="about"><td><a href="https://github.com/u/r">u/r</a></td></tr>
                   </table>"#,
                stars
            ));
            let EntryOutcome::Extracted(repo) = outcome else { panic!("expected repository") };
            assert_eq!(repo.stars, 0, "stars text {:?}", stars);
        }
    }

    #[test]
    fn test_optional_fields_default_empty() {
        let outcome = single(r#"<table><tr class="about"><td><a href="https://github.com/u/r">u/r</a></td></tr></table>"#);

        let EntryOutcome::Extracted(repo) = outcome else { panic!("expected repository") };
        assert_eq!(repo.description, "");
        assert_eq!(repo.stars, 0);
        assert_eq!(repo.language, "");
    }

    #[test]
    fn test_missing_tables_yield_empty_categories() {
        let doc = Document::parse("<html><body><p>No digest today</p></body></html>").unwrap();
        let report = extract_digest(&doc).unwrap();

        assert!(report.trending.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(report.trending.first, Vec::<Repository>::new());
    }

    #[test]
    fn test_category_report_counts_skips() {
        let html = r#"<table id="top-new"><tr><td>
            <div class="repository"><table><tr class="about"><td><a href="https://github.com/a/b">a/b</a></td></tr></table></div>
            <div class="repository">broken</div>
            <div class="repository"><table><tr class="about"><td><a href="https://github.com/c/d">c/d</a></td></tr></table></div>
          </td></tr></table>"#;
        let doc = Document::parse(html).unwrap();
        let report = extract_category(&doc, Category::TopNew).unwrap();

        assert_eq!(report.entries(), 3);
        assert_eq!(report.skipped, vec![SkipReason::MissingAnchor]);
        let names: Vec<&str> = report.repositories.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a/b", "c/d"]);
    }
}
