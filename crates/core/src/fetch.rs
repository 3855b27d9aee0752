//! Content fetching from URLs and files.
//!
//! Network access goes through the [`Fetcher`] trait so a run can be driven
//! by [`HttpFetcher`] in production and by an in-memory stub in tests.

use std::fs;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

use async_trait::async_trait;
#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use tracing::debug;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{NightlyError, Result};

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: concat!("nightly/", env!("CARGO_PKG_VERSION")).to_string() }
    }
}

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can GET a URL.
///
/// Transport failures are errors; a response with any status is not.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<FetchResponse>;
}

/// [`Fetcher`] backed by a shared reqwest client.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

#[cfg(feature = "fetch")]
impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(NightlyError::HttpError)?;

        Ok(Self { client, config })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[cfg(feature = "fetch")]
#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<FetchResponse> {
        let parsed_url = Url::parse(url).map_err(|e| NightlyError::InvalidUrl(e.to_string()))?;

        debug!(url = %parsed_url, "GET");
        let mut request = self.client.get(parsed_url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let timeout = self.config.timeout;
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                NightlyError::Timeout { timeout }
            } else {
                NightlyError::HttpError(e)
            }
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(FetchResponse { status, body })
    }
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(NightlyError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(NightlyError::from)
    }
}
