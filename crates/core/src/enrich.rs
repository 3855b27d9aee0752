//! README screenshot enrichment.
//!
//! For every repository the README rendering is fetched from the GitHub
//! API, run through the [screenshot classifier](crate::screenshot) and, if
//! an image is chosen, stored as an absolute URL in
//! [`Repository::screenshot`]. Failures only affect the repository they
//! happen on.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::fetch::Fetcher;
use crate::parse::Document;
use crate::repository::{Category, Repository, TrendingRepos};
use crate::screenshot::{is_absolute_url, screenshot_from_document};

/// Branch assumed when resolving README-relative image paths.
// TODO: ask the repository API for the real default branch instead of assuming "master".
pub const DEFAULT_BRANCH: &str = "master";

/// Media type asking the GitHub API for the README rendered as HTML.
pub const README_ACCEPT: &str = "application/vnd.github.v3.html";

/// Enrichment settings.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Maximum README fetches in flight. `1` processes repositories one by one.
    pub concurrency: usize,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// What enrichment concluded for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichOutcome {
    /// An image was chosen; the URL is absolute.
    Found(String),
    /// The README was read but holds no suitable image.
    NoScreenshot,
    /// The README could not be retrieved or read.
    Failed(String),
}

/// Tally of a [`Enricher::populate_all`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub found: usize,
    pub missing: usize,
    pub failed: usize,
}

impl EnrichSummary {
    fn record(&mut self, outcome: &EnrichOutcome) {
        match outcome {
            EnrichOutcome::Found(_) => self.found += 1,
            EnrichOutcome::NoScreenshot => self.missing += 1,
            EnrichOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.found + self.missing + self.failed
    }
}

/// Resolves a classifier result against the repository it came from.
pub fn resolve_screenshot(repo: &Repository, src: &str) -> String {
    if is_absolute_url(src) { src.to_string() } else { repo.raw_image_url(DEFAULT_BRANCH, src) }
}

/// Fetches READMEs and fills in screenshots.
#[derive(Clone)]
pub struct Enricher {
    fetcher: Arc<dyn Fetcher>,
    config: EnrichConfig,
}

impl Enricher {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: EnrichConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    /// Looks for a screenshot without modifying the repository.
    pub async fn find_screenshot(&self, repo: &Repository) -> EnrichOutcome {
        let url = repo.readme_url();

        let response = match self.fetcher.get(&url, &[("Accept", README_ACCEPT)]).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Could not get repository readme file, error: {}", e);
                return EnrichOutcome::Failed(e.to_string());
            }
        };

        if !response.is_success() {
            warn!("GET {} returned status {}", url, response.status);
            return EnrichOutcome::Failed(format!("README request returned status {}", response.status));
        }

        let found = Document::parse_bytes(&response.body).and_then(|doc| screenshot_from_document(&doc));
        match found {
            Ok(Some(src)) => {
                let screenshot = resolve_screenshot(repo, &src);
                info!("Screenshot chosen for {}: {}", repo.url, screenshot);
                EnrichOutcome::Found(screenshot)
            }
            Ok(None) => {
                info!("No screenshot detected for {}", repo.url);
                EnrichOutcome::NoScreenshot
            }
            Err(e) => {
                warn!("Could not read README of {}: {}", repo.url, e);
                EnrichOutcome::Failed(e.to_string())
            }
        }
    }

    /// Looks for a screenshot and stores it on the repository when found.
    pub async fn populate(&self, repo: &mut Repository) -> EnrichOutcome {
        let outcome = self.find_screenshot(repo).await;
        if let EnrichOutcome::Found(url) = &outcome {
            repo.screenshot = Some(url.clone());
        }
        outcome
    }

    /// Enriches every repository of every category.
    ///
    /// At most `concurrency` READMEs are fetched at once. Results are
    /// written back by position, so category order never depends on which
    /// fetch finishes first.
    pub async fn populate_all(&self, trending: &mut TrendingRepos) -> EnrichSummary {
        info!("Populating screenshots");

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for category in Category::ALL {
            for (index, repo) in trending.category(category).iter().enumerate() {
                let enricher = self.clone();
                let semaphore = Arc::clone(&semaphore);
                let repo = repo.clone();

                tasks.spawn(async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    let outcome = enricher.find_screenshot(&repo).await;
                    (category, index, outcome)
                });
            }
        }

        let mut summary = EnrichSummary::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((category, index, outcome)) => {
                    summary.record(&outcome);
                    if let EnrichOutcome::Found(url) = outcome {
                        if let Some(repo) = trending.category_mut(category).get_mut(index) {
                            repo.screenshot = Some(url);
                        }
                    }
                }
                Err(e) => {
                    warn!("Screenshot task failed: {}", e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            found = summary.found,
            missing = summary.missing,
            failed = summary.failed,
            "Screenshots populated"
        );

        summary
    }
}
