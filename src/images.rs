//! Stock image collection.
//!
//! One topic-keyed image plus one per static keyword, written as
//! `image_{i}.jpg`. Bodies are stored as received: no content-type check,
//! no retry, and files from earlier runs are left in place.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::http_client::HttpClient;
use crate::types::{ImageSet, Topic};

/// Collects the images for a topic into a folder.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn collect(&self, topic: &Topic, folder: &Path) -> Result<ImageSet>;
}

/// [`ImageSource`] fetching from a keyword URL pattern
pub struct ImageCollector {
    client: HttpClient,
    url_pattern: String,
    static_keywords: Vec<String>,
}

impl ImageCollector {
    /// `url_pattern` must contain `{keyword}`.
    pub fn new(client: HttpClient, url_pattern: &str, static_keywords: Vec<String>) -> Self {
        Self {
            client,
            url_pattern: url_pattern.to_string(),
            static_keywords,
        }
    }

    /// URLs fetched for `topic`, in order.
    #[must_use]
    pub fn image_urls(&self, topic: &Topic) -> Vec<String> {
        std::iter::once(topic.as_str())
            .chain(self.static_keywords.iter().map(String::as_str))
            .map(|keyword| {
                self.url_pattern
                    .replace("{keyword}", &urlencoding::encode(keyword))
            })
            .collect()
    }
}

/// File name for the `index`th image of a run.
#[must_use]
pub fn image_file_name(index: usize) -> String {
    format!("image_{index}.jpg")
}

#[async_trait]
impl ImageSource for ImageCollector {
    #[instrument(skip_all, fields(%topic, folder = %folder.display()))]
    async fn collect(&self, topic: &Topic, folder: &Path) -> Result<ImageSet> {
        info!("Downloading stock images");
        tokio::fs::create_dir_all(folder)
            .await
            .with_context(|| format!("failed to create {}", folder.display()))?;

        let mut files: Vec<PathBuf> = Vec::new();
        for (index, url) in self.image_urls(topic).iter().enumerate() {
            let (status, body) = self.client.get_bytes(url).await?;
            if !status.is_success() {
                warn!(%status, %url, "Image request not successful, saving body anyway");
            }

            let path = folder.join(image_file_name(index));
            tokio::fs::write(&path, &body)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            files.push(path);
        }

        info!(count = files.len(), "Saved images");
        Ok(ImageSet {
            folder: folder.to_path_buf(),
            files,
        })
    }
}
