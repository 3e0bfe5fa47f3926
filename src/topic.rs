//! Trending topic discovery.
//!
//! Fetches an RSS feed of trending searches and picks one `<item><title>`
//! uniformly at random. A non-success status degrades to
//! [`FALLBACK_TOPIC`]; transport errors propagate.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use scraper::{Html, Selector};
use tracing::{info, instrument, warn};

use crate::config::settings::FALLBACK_TOPIC;
use crate::error::PipelineError;
use crate::http_client::HttpClient;
use crate::types::Topic;

/// Produces the topic for a run.
#[async_trait]
pub trait TopicSource: Send + Sync {
    async fn pick_trending_topic(&self) -> Result<Topic>;
}

/// [`TopicSource`] backed by an RSS feed
pub struct TrendingFeed {
    client: HttpClient,
    url: String,
}

impl TrendingFeed {
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl TopicSource for TrendingFeed {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn pick_trending_topic(&self) -> Result<Topic> {
        info!("Finding trending topics");
        let response = self.client.get(&self.url).await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Trending feed unavailable, using fallback topic");
            return Ok(Topic::new(FALLBACK_TOPIC));
        }

        let body = response
            .text()
            .await
            .context("failed to read trending feed")?;
        let titles = parse_trending_titles(&body)?;
        info!(candidates = titles.len(), "Parsed trending feed");

        pick_topic(&titles, &mut rand::thread_rng())
    }
}

/// Extract every `<item><title>` from an RSS document, in document order.
pub fn parse_trending_titles(feed: &str) -> Result<Vec<String>> {
    let selector =
        Selector::parse("item > title").map_err(|e| anyhow!("invalid selector: {e}"))?;
    let document = Html::parse_document(feed);

    Ok(document
        .select(&selector)
        .map(|el| strip_cdata(&el.text().collect::<String>()).to_string())
        .filter(|title| !title.is_empty())
        .collect())
}

/// Choose one title uniformly at random.
pub fn pick_topic<R: Rng + ?Sized>(titles: &[String], rng: &mut R) -> Result<Topic> {
    titles
        .choose(rng)
        .map(|t| Topic::new(t.as_str()))
        .ok_or_else(|| PipelineError::EmptyFeed.into())
}

/// Titles may arrive wrapped in a CDATA section, which the HTML tokenizer keeps as text.
fn strip_cdata(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix("<![CDATA[")
        .and_then(|t| t.strip_suffix("]]>"))
        .map_or(text, str::trim)
}
