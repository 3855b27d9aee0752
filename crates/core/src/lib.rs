pub mod digest;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod publish;
pub mod repository;
pub mod run;
pub mod screenshot;

pub use digest::{CategoryReport, DigestReport, EntryOutcome, SkipReason};
pub use digest::{extract_category, extract_digest, extract_entry, parse_digest};
pub use enrich::{DEFAULT_BRANCH, EnrichConfig, EnrichOutcome, EnrichSummary, Enricher, README_ACCEPT, resolve_screenshot};
pub use error::{NightlyError, Result};
#[cfg(feature = "fetch")]
pub use fetch::HttpFetcher;
pub use fetch::{FetchConfig, FetchResponse, Fetcher, fetch_file};
pub use parse::{Document, Element};
#[cfg(feature = "fetch")]
pub use publish::GitHubPublisher;
pub use publish::{PublishConfig, Publisher, commit_message, create_file_payload};
pub use repository::{Category, Repository, TrendingRepos};
pub use run::{DigestSource, Run, RunReport, digest_url, output_path, yesterday};
pub use screenshot::{
    ImageCandidate, Noise, Selection, classify_noise, image_candidates, is_absolute_url, select_screenshot,
    screenshot_from_document, screenshot_from_html,
};
