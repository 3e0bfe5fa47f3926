//! YouTube upload via the Data API v3 resumable protocol.
//!
//! 1. POST the video resource (`part=snippet,status`) with
//!    `uploadType=resumable`; the session URL comes back in `Location`.
//! 2. PUT the file bytes to the session URL; the response is the created
//!    video resource.
//!
//! Visibility is always public.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use url::Url;

use super::{Platform, Post, PublishOutcome, PublishResult, Publisher};
use crate::capability::{Capability, YouTubeCredentials};
use crate::http_client::{ensure_success, HttpClient};

const VIDEO_CONTENT_TYPE: &str = "video/*";

/// Uploads the rendered video to a channel
pub struct YouTubePublisher {
    client: HttpClient,
    endpoint: String,
    capability: Capability<YouTubeCredentials>,
}

impl YouTubePublisher {
    pub fn new(
        client: HttpClient,
        endpoint: impl Into<String>,
        capability: Capability<YouTubeCredentials>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            capability,
        }
    }

    fn session_url(&self, credentials: &YouTubeCredentials) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint,
            [
                ("uploadType", "resumable"),
                ("part", "snippet,status"),
                ("key", credentials.api_key.as_str()),
            ],
        )
        .with_context(|| format!("invalid YouTube endpoint {}", self.endpoint))
    }

    #[instrument(skip_all, fields(video = %video.display()))]
    async fn upload(
        &self,
        video: &Path,
        resource: &VideoResource<'_>,
        credentials: &YouTubeCredentials,
    ) -> Result<PublishResult> {
        info!("Uploading video to YouTube");
        let bytes = tokio::fs::read(video)
            .await
            .with_context(|| format!("failed to read {}", video.display()))?;

        // Start the resumable session
        let response = self
            .client
            .inner()
            .post(self.session_url(credentials)?)
            .header("X-Upload-Content-Type", VIDEO_CONTENT_TYPE)
            .header("X-Upload-Content-Length", bytes.len())
            .json(resource)
            .send()
            .await
            .context("YouTube upload session request failed")?;
        let response = ensure_success(response, "YouTube").await?;

        let session = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .context("YouTube did not return an upload session URL")?;

        // Send the media in one request
        let response = self
            .client
            .put(&session)
            .header(reqwest::header::CONTENT_TYPE, VIDEO_CONTENT_TYPE)
            .body(bytes)
            .send()
            .await
            .context("YouTube media upload failed")?;
        let response = ensure_success(response, "YouTube").await?;

        let uploaded: UploadedVideo = response
            .json()
            .await
            .context("Failed to parse YouTube response")?;

        let url = format!("https://www.youtube.com/watch?v={}", uploaded.id);
        info!(%url, "Upload complete");
        Ok(PublishResult {
            platform: Platform::YouTube,
            outcome: PublishOutcome::Published {
                id: Some(uploaded.id),
                url: Some(url),
            },
        })
    }
}

#[async_trait]
impl Publisher for YouTubePublisher {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn publish(&self, post: &Post) -> Result<PublishResult> {
        match &self.capability {
            Capability::Enabled(credentials) => {
                let title = post.title();
                let description = post.description();
                let tags = post.tags();
                let resource = VideoResource::public(&title, &description, &tags, &credentials.channel_id);
                self.upload(&post.video, &resource, credentials).await
            }
            Capability::Disabled { missing } => {
                warn!(missing = ?missing, "Skipping YouTube upload (API key or channel ID missing)");
                Ok(PublishResult::skipped(Platform::YouTube, missing))
            }
            Capability::NotImplemented => Ok(PublishResult {
                platform: Platform::YouTube,
                outcome: PublishOutcome::NotImplemented,
            }),
        }
    }
}

// ============================================================================
// YouTube Data API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct VideoResource<'a> {
    snippet: Snippet<'a>,
    status: Status,
}

impl<'a> VideoResource<'a> {
    fn public(title: &'a str, description: &'a str, tags: &'a [String], channel_id: &'a str) -> Self {
        Self {
            snippet: Snippet {
                title,
                description,
                tags,
                channel_id,
            },
            status: Status {
                privacy_status: "public",
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Snippet<'a> {
    title: &'a str,
    description: &'a str,
    tags: &'a [String],
    channel_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Status {
    privacy_status: &'static str,
}

#[derive(Debug, Deserialize)]
struct UploadedVideo {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> YouTubeCredentials {
        YouTubeCredentials {
            api_key: "yt-key".to_string(),
            channel_id: "UC123".to_string(),
        }
    }

    #[test]
    fn resource_is_public_with_camel_case_fields() {
        let tags = vec!["a".to_string(), "news".to_string()];
        let resource = VideoResource::public("T", "D", &tags, "UC123");
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["status"]["privacyStatus"], "public");
        assert_eq!(json["snippet"]["channelId"], "UC123");
        assert_eq!(json["snippet"]["tags"][1], "news");
    }

    #[test]
    fn session_url_requests_resumable_snippet_and_status() {
        let publisher = YouTubePublisher::new(
            HttpClient::new().unwrap(),
            "https://www.googleapis.com/upload/youtube/v3/videos",
            Capability::Enabled(credentials()),
        );
        let url = publisher.session_url(&credentials()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("uploadType".to_string(), "resumable".to_string())));
        assert!(pairs.contains(&("part".to_string(), "snippet,status".to_string())));
        assert!(pairs.contains(&("key".to_string(), "yt-key".to_string())));
    }
}
