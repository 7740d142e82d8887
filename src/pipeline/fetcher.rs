//! Corpus source: canned sample dataset plus an optional live RSS path.
//!
//! URL sources are fetched and parsed into the common [`Article`] shape; any
//! network or parse failure falls back to the canned dataset (flagged, never
//! surfaced as a hard error). Non-URL sources must name a canned dataset.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::normalize_text;
use crate::error::{PipelineError, Result};
use crate::types::Article;

pub const DEFAULT_LIMIT: usize = 10;

/// Dataset key used when a live fetch falls back to canned content.
const FALLBACK_DATASET: &str = "sample";

static SAMPLE_CORPUS: Lazy<HashMap<String, Vec<Article>>> = Lazy::new(|| {
    #[derive(Deserialize)]
    struct SampleFile {
        sources: HashMap<String, Vec<Article>>,
    }
    let raw = include_str!("../../resources/sample_articles.json");
    let file: SampleFile = serde_json::from_str(raw).expect("valid sample corpus");
    file.sources
});

/// Tool output: the articles plus whether the live path fell back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    pub articles: Vec<Article>,
    pub fallback: bool,
}

/// A provider the live path can pull articles from.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> anyhow::Result<Vec<Article>>;
    fn name(&self) -> String;
}

/// RSS-over-HTTP provider. `from_fixture` skips the network for tests.
pub struct RssFeedProvider {
    url: String,
    fixture: Option<String>,
}

impl RssFeedProvider {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            fixture: None,
        }
    }

    pub fn from_fixture(url: &str, content: &str) -> Self {
        Self {
            url: url.to_string(),
            fixture: Some(content.to_string()),
        }
    }
}

#[async_trait]
impl SourceProvider for RssFeedProvider {
    async fn fetch_latest(&self) -> anyhow::Result<Vec<Article>> {
        let body = match &self.fixture {
            Some(content) => content.clone(),
            None => {
                let http = reqwest::Client::builder()
                    .user_agent("newsroom-pipeline/0.1")
                    .timeout(Duration::from_secs(10))
                    .build()
                    .context("building http client")?;
                http.get(&self.url)
                    .send()
                    .await
                    .context("requesting feed")?
                    .error_for_status()
                    .context("feed returned an error status")?
                    .text()
                    .await
                    .context("reading feed body")?
            }
        };
        parse_rss(&body, &self.url)
    }

    fn name(&self) -> String {
        self.url.clone()
    }
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    author: Option<String>,
}

/// RFC 2822 pubDate → RFC 3339; unparsable dates get the fetch time.
fn normalize_timestamp(raw: Option<&str>) -> String {
    raw.and_then(|ts| DateTime::parse_from_rfc2822(ts).ok())
        .map(|dt| dt.with_timezone(&Utc).to_rfc3339())
        .unwrap_or_else(|| Utc::now().to_rfc3339())
}

fn parse_rss(feed_text: &str, source: &str) -> anyhow::Result<Vec<Article>> {
    let rss: Rss = quick_xml::de::from_str(feed_text)
        .with_context(|| format!("parsing rss feed from '{source}'"))?;

    let mut articles = Vec::with_capacity(rss.channel.items.len());
    for item in rss.channel.items {
        let link = item.link.clone().unwrap_or_else(|| source.to_string());
        let id = item.guid.clone().unwrap_or_else(|| link.clone());
        let title = normalize_text(item.title.as_deref().unwrap_or("Untitled story"));
        let content = normalize_text(item.description.as_deref().unwrap_or_default());
        articles.push(Article {
            id,
            source: source.to_string(),
            title,
            url: link,
            timestamp: normalize_timestamp(item.pub_date.as_deref()),
            author: item.author.clone().unwrap_or_else(|| "Unknown".to_string()),
            content,
        });
    }
    Ok(articles)
}

fn looks_like_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn parse_since(since: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match since {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| {
                PipelineError::InvalidInput(format!("'since' is not an RFC 3339 timestamp: {raw}"))
            }),
    }
}

fn filter_since(articles: Vec<Article>, since: Option<DateTime<Utc>>) -> Vec<Article> {
    match since {
        None => articles,
        Some(cutoff) => articles
            .into_iter()
            .filter(|a| {
                DateTime::parse_from_rfc3339(&a.timestamp)
                    .map(|dt| dt.with_timezone(&Utc) >= cutoff)
                    .unwrap_or(false)
            })
            .collect(),
    }
}

fn canned_articles(dataset: &str) -> Result<Vec<Article>> {
    SAMPLE_CORPUS.get(dataset).cloned().ok_or_else(|| {
        let mut available: Vec<&str> = SAMPLE_CORPUS.keys().map(String::as_str).collect();
        available.sort_unstable();
        PipelineError::InvalidInput(format!(
            "unknown news source '{dataset}'; available: {}",
            available.join(", ")
        ))
    })
}

/// Fetch the latest articles from `source`.
///
/// Canned dataset names return their articles verbatim in dataset order. URL
/// sources go through `provider`; failures fall back to the canned corpus
/// with `fallback = true`.
pub async fn fetch_articles_from(
    provider: &dyn SourceProvider,
    source: &str,
    since: Option<&str>,
    limit: Option<usize>,
) -> Result<FetchResult> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    let since = parse_since(since)?;

    if looks_like_url(source) {
        match provider.fetch_latest().await {
            Ok(mut articles) => {
                // Live feeds are ordered newest first before truncation.
                articles.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                let mut articles = filter_since(articles, since);
                articles.truncate(limit);
                debug!(source, count = articles.len(), "live fetch ok");
                return Ok(FetchResult {
                    articles,
                    fallback: false,
                });
            }
            Err(e) => {
                warn!(source, error = %e, "live fetch failed; falling back to canned corpus");
                let mut articles = filter_since(canned_articles(FALLBACK_DATASET)?, since);
                articles.truncate(limit);
                return Ok(FetchResult {
                    articles,
                    fallback: true,
                });
            }
        }
    }

    let mut articles = filter_since(canned_articles(source)?, since);
    articles.truncate(limit);
    Ok(FetchResult {
        articles,
        fallback: false,
    })
}

/// Convenience wrapper building the default RSS provider for URL sources.
pub async fn fetch_articles(
    source: &str,
    since: Option<&str>,
    limit: Option<usize>,
) -> Result<FetchResult> {
    let provider = RssFeedProvider::new(source);
    fetch_articles_from(&provider, source, since, limit).await
}
