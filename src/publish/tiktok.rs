//! TikTok placeholder.
//!
//! There is no TikTok client in this build. A configured username yields
//! [`PublishOutcome::NotImplemented`] so callers can tell it apart from a
//! skip caused by missing credentials. No request is ever made.

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use super::{Platform, Post, PublishOutcome, PublishResult, Publisher};
use crate::capability::{Capability, TikTokCredentials};

pub struct TikTokPublisher {
    capability: Capability<TikTokCredentials>,
}

impl TikTokPublisher {
    #[must_use]
    pub fn new(capability: Capability<TikTokCredentials>) -> Self {
        Self { capability }
    }
}

#[async_trait]
impl Publisher for TikTokPublisher {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    async fn publish(&self, post: &Post) -> Result<PublishResult> {
        match &self.capability {
            Capability::Disabled { missing } => {
                warn!(missing = ?missing, "Skipping TikTok upload (credentials missing)");
                Ok(PublishResult::skipped(Platform::TikTok, missing))
            }
            Capability::Enabled(_) | Capability::NotImplemented => {
                warn!(
                    video = %post.video.display(),
                    "TikTok upload requested but not implemented in this build"
                );
                Ok(PublishResult {
                    platform: Platform::TikTok,
                    outcome: PublishOutcome::NotImplemented,
                })
            }
        }
    }
}
