//! One end-to-end run: fetch the digest, extract, enrich, publish.
//!
//! Fetching or parsing the digest and publishing are fatal; everything in
//! between only degrades the output.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use tracing::info;

use crate::digest::{DigestReport, extract_digest};
use crate::enrich::{EnrichConfig, EnrichSummary, Enricher};
use crate::fetch::Fetcher;
use crate::parse::Document;
use crate::publish::{Publisher, commit_message};
use crate::repository::TrendingRepos;
use crate::{NightlyError, Result};

const DIGEST_BASE: &str = "http://nightly.changelog.com";

/// URL of the digest published for `date`.
pub fn digest_url(date: NaiveDate) -> String {
    format!("{}/{}", DIGEST_BASE, date.format("%Y/%m/%d"))
}

/// Path of the published JSON for `date`, e.g. `2018-02-08.json`.
pub fn output_path(date: NaiveDate) -> String {
    date.format("%Y-%m-%d.json").to_string()
}

/// The most recent complete digest day.
pub fn yesterday() -> NaiveDate {
    let today = Utc::now().date_naive();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

/// Where the digest HTML comes from.
#[derive(Debug, Clone)]
pub enum DigestSource {
    /// Fetch the digest for the run date.
    Remote,
    /// Use HTML already in hand (e.g. read from a file).
    Html(String),
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub date: NaiveDate,
    pub digest: DigestReport,
    pub enrichment: Option<EnrichSummary>,
    /// Serialized trending JSON, exactly as published.
    pub json: String,
    /// Path the JSON was published to, if a publisher was configured.
    pub published_to: Option<String>,
}

impl RunReport {
    pub fn trending(&self) -> &TrendingRepos {
        &self.digest.trending
    }
}

/// A configured run. Capabilities are injected rather than global.
pub struct Run {
    fetcher: Arc<dyn Fetcher>,
    publisher: Option<Arc<dyn Publisher>>,
    enrich: Option<EnrichConfig>,
    date: NaiveDate,
    source: DigestSource,
    pretty: bool,
}

impl Run {
    /// A run for yesterday's digest, fetched remotely, enriched, not published.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            publisher: None,
            enrich: Some(EnrichConfig::default()),
            date: yesterday(),
            source: DigestSource::Remote,
            pretty: false,
        }
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn source(mut self, source: DigestSource) -> Self {
        self.source = source;
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Sets enrichment settings; `None` skips screenshots entirely.
    pub fn enrich(mut self, config: Option<EnrichConfig>) -> Self {
        self.enrich = config;
        self
    }

    /// Serialize with indentation instead of the compact form.
    pub fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }

    async fn digest_html(&self) -> Result<String> {
        match &self.source {
            DigestSource::Html(html) => Ok(html.clone()),
            DigestSource::Remote => {
                let url = digest_url(self.date);
                info!("Getting data from {}", url);

                let response = self.fetcher.get(&url, &[]).await?;
                if !response.is_success() {
                    return Err(NightlyError::UnexpectedStatus { status: response.status, url });
                }
                Ok(response.text())
            }
        }
    }

    /// Executes the run.
    ///
    /// # Errors
    ///
    /// Fails if the digest cannot be fetched or parsed, or if publishing
    /// fails. Nothing is published when an earlier step fails.
    pub async fn execute(self) -> Result<RunReport> {
        let html = self.digest_html().await?;
        let mut digest = {
            let doc = Document::parse(&html)?;
            extract_digest(&doc)?
        };

        let enrichment = match &self.enrich {
            Some(config) => {
                let enricher = Enricher::new(Arc::clone(&self.fetcher), config.clone());
                Some(enricher.populate_all(&mut digest.trending).await)
            }
            None => None,
        };

        let json = if self.pretty { digest.trending.to_json_pretty()? } else { digest.trending.to_json()? };

        let published_to = match &self.publisher {
            Some(publisher) => {
                let path = output_path(self.date);
                publisher.put(&path, json.as_bytes(), &commit_message(self.date)).await?;
                Some(path)
            }
            None => None,
        };

        Ok(RunReport { date: self.date, digest, enrichment, json, published_to })
    }
}
