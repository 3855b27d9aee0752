//! Repository records and the per-run trending aggregate.
//!
//! A [`Repository`] is built once by the digest extractor and mutated only
//! by enrichment, which may fill in its `screenshot`. [`TrendingRepos`]
//! groups the records into the three digest categories and fixes the JSON
//! shape handed to the publisher.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Result;

/// One of the three fixed groupings of the nightly digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Top starred repositories not previously featured.
    FirstTimers,
    /// Top repositories open sourced on the digest day.
    TopNew,
    /// Top starred repositories that were featured before.
    RepeatPerformers,
}

impl Category {
    /// All categories in output order.
    pub const ALL: [Category; 3] = [Category::FirstTimers, Category::TopNew, Category::RepeatPerformers];

    /// The `id` of the digest table listing this category.
    pub fn table_id(self) -> &'static str {
        match self {
            Category::FirstTimers => "top-all-firsts",
            Category::TopNew => "top-new",
            Category::RepeatPerformers => "top-all-repeats",
        }
    }

    /// The field name used for this category in the published JSON.
    pub fn json_key(self) -> &'static str {
        match self {
            Category::FirstTimers => "FirstTimers",
            Category::TopNew => "TopNew",
            Category::RepeatPerformers => "RepeatPerformers",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_id())
    }
}

/// The most relevant information available for one trending repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Display identifier, typically `owner/repo`.
    #[serde(rename = "Name")]
    pub name: String,

    /// Canonical repository URL.
    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "Description", default)]
    pub description: String,

    /// Total stars; zero when the digest did not carry a readable count.
    #[serde(rename = "Stars", default)]
    pub stars: u64,

    #[serde(rename = "Language", default)]
    pub language: String,

    /// Absolute URL of the chosen README image, if enrichment found one.
    #[serde(
        rename = "Screenshot",
        default,
        serialize_with = "serialize_screenshot",
        deserialize_with = "deserialize_screenshot"
    )]
    pub screenshot: Option<String>,
}

// Absent screenshots travel as "" on the wire.
fn serialize_screenshot<S: Serializer>(value: &Option<String>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or_default())
}

fn deserialize_screenshot<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Rewrites the GitHub host of `url` to `host`, keeping the scheme.
fn rewrite_github_host(url: &str, host: &str) -> String {
    let rewritten = url.replacen("www.github.com", host, 1);
    rewritten.replacen("/github.com", &format!("/{}", host), 1)
}

impl Repository {
    /// Creates a repository with only the mandatory fields set.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { name: name.into(), url: url.into(), ..Default::default() }
    }

    /// A record is usable only when both its name and URL are known.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.url.is_empty()
    }

    /// URL of the default README through the GitHub API
    /// (e.g. `https://api.github.com/repos/user1/repo1/readme`).
    pub fn readme_url(&self) -> String {
        let u = rewrite_github_host(&self.url, "api.github.com/repos");
        format!("{}/readme", u.trim_end_matches('/'))
    }

    /// Absolute URL of a file stored inside the repository on `branch`
    /// (e.g. `https://raw.githubusercontent.com/user1/repo1/master/screenshot.jpg`).
    pub fn raw_image_url(&self, branch: &str, relative_path: &str) -> String {
        let u = rewrite_github_host(&self.url, "raw.githubusercontent.com");
        format!("{}/{}/{}", u.trim_end_matches('/'), branch, relative_path)
    }
}

/// Trending repositories of one digest, grouped by category.
///
/// Each sequence keeps the order in which the digest lists its entries.
/// Nothing is deduplicated across categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingRepos {
    #[serde(rename = "FirstTimers", default)]
    pub first: Vec<Repository>,

    #[serde(rename = "TopNew", default)]
    pub new: Vec<Repository>,

    #[serde(rename = "RepeatPerformers", default)]
    pub repeaters: Vec<Repository>,
}

impl TrendingRepos {
    /// Number of repositories across all categories.
    pub fn total(&self) -> usize {
        self.first.len() + self.new.len() + self.repeaters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn category(&self, category: Category) -> &[Repository] {
        match category {
            Category::FirstTimers => &self.first,
            Category::TopNew => &self.new,
            Category::RepeatPerformers => &self.repeaters,
        }
    }

    pub fn category_mut(&mut self, category: Category) -> &mut Vec<Repository> {
        match category {
            Category::FirstTimers => &mut self.first,
            Category::TopNew => &mut self.new,
            Category::RepeatPerformers => &mut self.repeaters,
        }
    }

    /// Iterates over every repository, category by category.
    pub fn iter(&self) -> impl Iterator<Item = &Repository> {
        self.first.iter().chain(self.new.iter()).chain(self.repeaters.iter())
    }

    /// Iterates mutably over every repository, category by category.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Repository> {
        self.first
            .iter_mut()
            .chain(self.new.iter_mut())
            .chain(self.repeaters.iter_mut())
    }

    /// Compact JSON, the form uploaded by the publisher.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TrendingRepos {
        let mut first = Repository::new("user1/repo1", "https://github.com/user1/repo1");
        first.description = "A non existing C library.".to_string();
        first.stars = 168;
        first.language = "C".to_string();
        first.screenshot = Some("https://raw.githubusercontent.com/user1/repo1/master/demo.gif".to_string());

        TrendingRepos {
            first: vec![first, Repository::new("user2/repo2", "https://github.com/user2/repo2")],
            new: vec![Repository::new("user3/repo3", "https://github.com/user3/repo3")],
            repeaters: vec![],
        }
    }

    #[test]
    fn test_readme_url() {
        let cases = [
            ("https://github.com/user/repo", "https://api.github.com/repos/user/repo/readme"),
            ("https://www.github.com/user/repo", "https://api.github.com/repos/user/repo/readme"),
            ("http://github.com/user/repo", "http://api.github.com/repos/user/repo/readme"),
            ("http://www.github.com/user/repo/", "http://api.github.com/repos/user/repo/readme"),
        ];

        for (url, want) in cases {
            assert_eq!(Repository::new("x", url).readme_url(), want, "readme url for {}", url);
        }
    }

    #[test]
    fn test_raw_image_url() {
        let cases = [
            (
                "https://github.com/user/repo",
                "images/screenshot.jpg",
                "https://raw.githubusercontent.com/user/repo/master/images/screenshot.jpg",
            ),
            (
                "https://www.github.com/user/repo",
                "images/image.jpg",
                "https://raw.githubusercontent.com/user/repo/master/images/image.jpg",
            ),
            (
                "http://github.com/user/repo",
                "images/demo.png",
                "http://raw.githubusercontent.com/user/repo/master/images/demo.png",
            ),
        ];

        for (url, path, want) in cases {
            assert_eq!(Repository::new("x", url).raw_image_url("master", path), want);
        }
    }

    #[test]
    fn test_is_valid() {
        assert!(Repository::new("user/repo", "https://github.com/user/repo").is_valid());
        assert!(!Repository::new("", "https://github.com/user/repo").is_valid());
        assert!(!Repository::new("user/repo", "").is_valid());
    }

    #[test]
    fn test_json_field_names() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();

        assert!(json.get("FirstTimers").is_some());
        assert!(json.get("TopNew").is_some());
        assert_eq!(json["RepeatPerformers"], serde_json::json!([]));

        let repo = &json["FirstTimers"][0];
        assert_eq!(repo["Name"], "user1/repo1");
        assert_eq!(repo["URL"], "https://github.com/user1/repo1");
        assert_eq!(repo["Description"], "A non existing C library.");
        assert_eq!(repo["Stars"], 168);
        assert_eq!(repo["Language"], "C");
        assert_eq!(json["FirstTimers"][1]["Screenshot"], "");
    }

    #[test]
    fn test_json_round_trip_keeps_order_and_values() {
        let trending = sample();
        let parsed = TrendingRepos::from_json(&trending.to_json().unwrap()).unwrap();

        assert_eq!(parsed, trending);
        assert_eq!(parsed.first[1].screenshot, None);
    }

    #[test]
    fn test_category_accessors() {
        let mut trending = sample();
        assert_eq!(trending.total(), 3);
        assert_eq!(trending.category(Category::TopNew).len(), 1);

        trending.category_mut(Category::RepeatPerformers).push(Repository::new("user4/repo4", "u4"));
        let names: Vec<&str> = trending.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["user1/repo1", "user2/repo2", "user3/repo3", "user4/repo4"]);
    }

    #[test]
    fn test_category_tokens() {
        let ids: Vec<&str> = Category::ALL.iter().map(|c| c.table_id()).collect();
        assert_eq!(ids, ["top-all-firsts", "top-new", "top-all-repeats"]);
        assert_eq!(Category::TopNew.json_key(), "TopNew");
    }
}
