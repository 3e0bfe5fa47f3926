//! Twitter/X status posting (API v2, OAuth 1.0a user context).

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::oauth::{authorization_header, Nonce};
use super::{Platform, Post, PublishOutcome, PublishResult, Publisher};
use crate::capability::{Capability, TwitterCredentials};
use crate::http_client::{ensure_success, HttpClient};

/// Posts the run's announcement as a tweet
pub struct TwitterPublisher {
    client: HttpClient,
    endpoint: String,
    capability: Capability<TwitterCredentials>,
}

impl TwitterPublisher {
    pub fn new(
        client: HttpClient,
        endpoint: impl Into<String>,
        capability: Capability<TwitterCredentials>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            capability,
        }
    }

    #[instrument(skip_all)]
    async fn post_status(&self, text: &str, credentials: &TwitterCredentials) -> Result<PublishResult> {
        info!("Sharing video on Twitter");
        let authorization =
            authorization_header("POST", &self.endpoint, &[], credentials, &Nonce::generate())?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(&TweetRequest { text })
            .send()
            .await
            .context("Twitter request failed")?;
        let response = ensure_success(response, "Twitter").await?;

        let created: TweetResponse = response
            .json()
            .await
            .context("Failed to parse Twitter response")?;

        let url = format!("https://x.com/i/web/status/{}", created.data.id);
        info!(%url, "Tweet posted");
        Ok(PublishResult {
            platform: Platform::Twitter,
            outcome: PublishOutcome::Published {
                id: Some(created.data.id),
                url: Some(url),
            },
        })
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn publish(&self, post: &Post) -> Result<PublishResult> {
        match &self.capability {
            Capability::Enabled(credentials) => self.post_status(&post.message(), credentials).await,
            Capability::Disabled { missing } => {
                warn!(missing = ?missing, "Skipping Twitter post (credentials missing)");
                Ok(PublishResult::skipped(Platform::Twitter, missing))
            }
            Capability::NotImplemented => Ok(PublishResult {
                platform: Platform::Twitter,
                outcome: PublishOutcome::NotImplemented,
            }),
        }
    }
}

// ============================================================================
// Twitter API v2 Types
// ============================================================================

#[derive(Debug, Serialize)]
struct TweetRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TweetResponse {
    data: TweetData,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Topic;

    #[tokio::test]
    async fn missing_credentials_skip() {
        let publisher = TwitterPublisher::new(
            HttpClient::new().unwrap(),
            "http://127.0.0.1:9/2/tweets",
            Capability::Disabled {
                missing: vec!["twitter_access_secret"],
            },
        );
        let result = publisher
            .publish(&Post::new(Topic::new("x"), "video.mp4"))
            .await
            .unwrap();
        assert_eq!(
            result.outcome,
            PublishOutcome::Skipped {
                reason: "missing twitter_access_secret".to_string()
            }
        );
    }

    #[test]
    fn parses_created_tweet() {
        let json = r#"{"data":{"id":"1445880548472328192","text":"Hello"}}"#;
        let response: TweetResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.id, "1445880548472328192");
    }
}
