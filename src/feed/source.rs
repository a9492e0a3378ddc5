//! Feed source clients
//!
//! A source hands back the whole `videos` collection in one go; callers
//! replace their feed with the result. Two shapes of body are accepted:
//! a bare JSON array of posts, or an object with a `videos` array.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::models::VideoPost;

/// Body formats accepted from every source
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    List(Vec<VideoPost>),
    Wrapped { videos: Vec<VideoPost> },
}

/// Parse a feed document
pub fn parse_posts(text: &str) -> Result<Vec<VideoPost>> {
    let doc: FeedDocument = serde_json::from_str(text).context("Failed to parse feed JSON")?;
    Ok(match doc {
        FeedDocument::List(posts) => posts,
        FeedDocument::Wrapped { videos } => videos,
    })
}

/// Something that can produce the current feed
#[allow(async_fn_in_trait)]
pub trait FeedSource {
    /// Fetch every post, in feed order
    async fn fetch(&self) -> Result<Vec<VideoPost>>;
}

// =============================================================================
// File Source
// =============================================================================

/// Posts exported to a local JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<VideoPost>> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read feed file {}", self.path.display()))?;
        let posts = parse_posts(&text)?;
        debug!(path = %self.path.display(), count = posts.len(), "loaded feed file");
        Ok(posts)
    }
}

// =============================================================================
// HTTP Source
// =============================================================================

/// Posts served as JSON at `{base_url}/videos.json`
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn videos_url(&self) -> String {
        if self.base_url.ends_with(".json") {
            self.base_url.clone()
        } else {
            format!("{}/videos.json", self.base_url)
        }
    }
}

impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<Vec<VideoPost>> {
        let url = self.videos_url();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch feed")?;

        // Check for HTTP errors
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Feed endpoint returned HTTP {}", status);
        }

        let text = response
            .text()
            .await
            .context("Failed to read response body")?;

        let posts = parse_posts(&text)?;
        debug!(%url, count = posts.len(), "fetched feed");
        Ok(posts)
    }
}

// =============================================================================
// Source Selection
// =============================================================================

/// A configured source, chosen from a path or URL string
#[derive(Debug, Clone)]
pub enum FeedSpec {
    File(JsonFileSource),
    Http(HttpFeedSource),
}

impl FeedSpec {
    /// `http://` and `https://` locations are endpoints, anything else a path
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            FeedSpec::Http(HttpFeedSource::new(trimmed))
        } else {
            FeedSpec::File(JsonFileSource::new(trimmed))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, FeedSpec::Http(_))
    }
}

impl FeedSource for FeedSpec {
    async fn fetch(&self) -> Result<Vec<VideoPost>> {
        match self {
            FeedSpec::File(source) => source.fetch().await,
            FeedSpec::Http(source) => source.fetch().await,
        }
    }
}

impl fmt::Display for FeedSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSpec::File(source) => write!(f, "{}", source.path().display()),
            FeedSpec::Http(source) => write!(f, "{}", source.base_url()),
        }
    }
}
