use anyhow::Result;

use trendcast::topic::{TopicSource, TrendingFeed};
use trendcast::{HttpClient, Settings};

pub async fn cmd_topic(settings: &Settings) -> Result<()> {
    eprintln!("🔎 Feed: {}", settings.endpoints.trending_feed);

    let feed = TrendingFeed::new(HttpClient::new()?, &settings.endpoints.trending_feed);
    let topic = feed.pick_trending_topic().await?;

    println!("{topic}");
    Ok(())
}
