//! Multi-platform publishing.
//!
//! Each platform is an independent [`Publisher`] gated by its own
//! [`Capability`](crate::capability::Capability). A disabled publisher
//! returns [`PublishOutcome::Skipped`] without touching the network; the
//! short-video platform has no client and reports
//! [`PublishOutcome::NotImplemented`] when configured.
//!
//! Publishers run in order and share one [`Post`]. When an upload yields a
//! public link, later publishers (the tweet) use it.

pub mod oauth;
pub mod tiktok;
pub mod twitter;
pub mod youtube;

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Topic;

pub use tiktok::TikTokPublisher;
pub use twitter::TwitterPublisher;
pub use youtube::YouTubePublisher;

/// Text used in the tweet until a video link is known.
pub const LINK_PLACEHOLDER: &str = "[YouTube Link]";

/// Target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    Twitter,
    TikTok,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YouTube => f.write_str("YouTube"),
            Self::Twitter => f.write_str("Twitter"),
            Self::TikTok => f.write_str("TikTok"),
        }
    }
}

/// What happened on one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published {
        id: Option<String>,
        url: Option<String>,
    },
    /// Credentials missing; no request was made.
    Skipped { reason: String },
    /// Credentials present, but this build cannot publish there.
    NotImplemented,
}

/// Per-platform result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub platform: Platform,
    pub outcome: PublishOutcome,
}

impl PublishResult {
    #[must_use]
    pub fn skipped(platform: Platform, missing: &[&str]) -> Self {
        Self {
            platform,
            outcome: PublishOutcome::Skipped {
                reason: format!("missing {}", missing.join(", ")),
            },
        }
    }

    /// Public link of the published item, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match &self.outcome {
            PublishOutcome::Published { url, .. } => url.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for PublishResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            PublishOutcome::Published { url: Some(url), .. } => {
                write!(f, "{}: published ({url})", self.platform)
            }
            PublishOutcome::Published { url: None, .. } => write!(f, "{}: published", self.platform),
            PublishOutcome::Skipped { reason } => write!(f, "{}: skipped ({reason})", self.platform),
            PublishOutcome::NotImplemented => write!(f, "{}: not implemented", self.platform),
        }
    }
}

/// Content shared by every publisher in a run.
#[derive(Debug, Clone)]
pub struct Post {
    pub topic: Topic,
    pub video: PathBuf,
    /// Link to the uploaded video, once a publisher has produced one.
    pub link: Option<String>,
}

impl Post {
    pub fn new(topic: Topic, video: impl Into<PathBuf>) -> Self {
        Self {
            topic,
            video: video.into(),
            link: None,
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        format!("{} Explained!", self.topic)
    }

    #[must_use]
    pub fn description(&self) -> String {
        format!("Latest news about {}.", self.topic)
    }

    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        vec![
            self.topic.to_string(),
            "news".to_string(),
            "trending".to_string(),
        ]
    }

    /// Status text for microblogging.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "New video: {}! Watch here: {}",
            self.topic,
            self.link.as_deref().unwrap_or(LINK_PLACEHOLDER)
        )
    }
}

/// Publishes a post to one platform.
#[async_trait]
pub trait Publisher: Send + Sync {
    fn platform(&self) -> Platform;

    async fn publish(&self, post: &Post) -> Result<PublishResult>;
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use tracing::instrument::WithSubscriber;

    use super::*;
    use crate::capability::Capability;
    use crate::http_client::HttpClient;

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn credential_skips_are_warnings() {
        let logs = LogBuffer::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .without_time()
            .with_writer(move || sink.clone())
            .finish();

        let client = HttpClient::new().unwrap();
        let publishers: Vec<Box<dyn Publisher>> = vec![
            Box::new(YouTubePublisher::new(
                client.clone(),
                "http://127.0.0.1:9/upload",
                Capability::Disabled {
                    missing: vec!["youtube_api_key"],
                },
            )),
            Box::new(TwitterPublisher::new(
                client,
                "http://127.0.0.1:9/2/tweets",
                Capability::Disabled {
                    missing: vec!["twitter_api_key"],
                },
            )),
            Box::new(TikTokPublisher::new(Capability::Disabled {
                missing: vec!["tiktok_username"],
            })),
        ];

        let post = Post::new(Topic::new("Mars rover"), "video.mp4");
        async {
            for publisher in &publishers {
                publisher.publish(&post).await.unwrap();
            }
        }
        .with_subscriber(subscriber)
        .await;

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let warnings: Vec<&str> = output.lines().filter(|l| l.contains("WARN")).collect();
        assert_eq!(warnings.len(), 3, "{output}");
        assert!(warnings[0].contains("Skipping YouTube upload"));
        assert!(warnings[1].contains("Skipping Twitter post"));
        assert!(warnings[2].contains("Skipping TikTok upload"));
    }

    #[test]
    fn metadata_comes_from_topic() {
        let post = Post::new(Topic::new("Mars rover"), "video.mp4");
        assert_eq!(post.title(), "Mars rover Explained!");
        assert_eq!(post.description(), "Latest news about Mars rover.");
        assert_eq!(post.tags(), vec!["Mars rover", "news", "trending"]);
    }

    #[test]
    fn message_uses_placeholder_until_linked() {
        let mut post = Post::new(Topic::new("Mars rover"), "video.mp4");
        assert_eq!(
            post.message(),
            "New video: Mars rover! Watch here: [YouTube Link]"
        );
        post.link = Some("https://www.youtube.com/watch?v=abc".to_string());
        assert_eq!(
            post.message(),
            "New video: Mars rover! Watch here: https://www.youtube.com/watch?v=abc"
        );
    }

    #[test]
    fn skipped_result_lists_missing_fields() {
        let result = PublishResult::skipped(Platform::YouTube, &["youtube_api_key", "channel_id"]);
        assert_eq!(
            result.to_string(),
            "YouTube: skipped (missing youtube_api_key, channel_id)"
        );
        assert_eq!(result.url(), None);
    }
}
