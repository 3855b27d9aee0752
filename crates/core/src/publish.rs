//! Publishing the trending JSON to a GitHub repository.
//!
//! The file is committed through the contents API
//! (`PUT /repos/:owner/:repo/contents/:path`). Credentials come from the
//! environment only.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
#[cfg(feature = "fetch")]
use tracing::info;

use crate::{NightlyError, Result};

pub const OWNER_VAR: &str = "GITHUB_OWNER";
pub const REPOSITORY_VAR: &str = "GITHUB_REPOSITORY";
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Where and as whom to publish.
#[derive(Clone)]
pub struct PublishConfig {
    pub owner: String,
    pub repository: String,
    pub token: String,
    /// API root, without trailing slash.
    pub api_base: String,
}

impl std::fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishConfig")
            .field("owner", &self.owner)
            .field("repository", &self.repository)
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl PublishConfig {
    pub fn new(owner: impl Into<String>, repository: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Reads `GITHUB_OWNER`, `GITHUB_REPOSITORY` and `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`NightlyError::ConfigError`] naming the first variable that
    /// is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |name: &str, what: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| NightlyError::ConfigError(format!("Upload GitHub {} not specified ({})", what, name)))
        };

        let owner = require(OWNER_VAR, "owner")?;
        let repository = require(REPOSITORY_VAR, "repository")?;
        let token = require(TOKEN_VAR, "token")?;

        Ok(Self::new(owner, repository, token))
    }

    /// Contents API URL for `path`.
    pub fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.repository,
            path
        )
    }
}

/// Commit message used for a digest day, e.g. `Uploading trending repos for 2018-02-08`.
pub fn commit_message(date: chrono::NaiveDate) -> String {
    format!("Uploading trending repos for {}", date.format("%Y-%m-%d"))
}

#[derive(Debug, Serialize)]
struct Committer<'a> {
    name: &'a str,
    email: &'a str,
}

/// Body of a contents API "create a file" request.
#[derive(Debug, Serialize)]
struct CreateFile<'a> {
    message: &'a str,
    content: String,
    committer: Committer<'a>,
}

/// Serializes the contents API request body for `body`.
pub fn create_file_payload(body: &[u8], message: &str) -> Result<String> {
    let params = CreateFile {
        message,
        content: STANDARD.encode(body),
        committer: Committer { name: "Bot", email: "bot@example.com" },
    };
    Ok(serde_json::to_string_pretty(&params)?)
}

/// Something that can store a file under a path.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn put(&self, path: &str, body: &[u8], message: &str) -> Result<()>;
}

/// [`Publisher`] committing files through the GitHub contents API.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct GitHubPublisher {
    client: reqwest::Client,
    config: PublishConfig,
}

#[cfg(feature = "fetch")]
impl GitHubPublisher {
    pub fn new(client: reqwest::Client, config: PublishConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }
}

#[cfg(feature = "fetch")]
#[async_trait]
impl Publisher for GitHubPublisher {
    async fn put(&self, path: &str, body: &[u8], message: &str) -> Result<()> {
        let url = self.config.contents_url(path);
        let payload = create_file_payload(body, message)?;

        let response = self
            .client
            .put(&url)
            .header("Authorization", format!("token {}", self.config.token))
            .header("Content-Type", "application/json; charset=utf-8")
            .body(payload)
            .send()
            .await
            .map_err(|e| NightlyError::Transport(format!("uploading to {} failed with error: {}", url, e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            let message = response.text().await.unwrap_or_default();
            return Err(NightlyError::PublishFailed { status: status.as_u16(), url, message });
        }

        info!("Uploaded {}", url);
        Ok(())
    }
}
