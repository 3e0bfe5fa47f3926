//! `trendcast` - trending topic to narrated video, published
//!
//! # Stages
//!
//! - **Topic**: random title from a trending-searches RSS feed
//! - **Script**: OpenAI chat completion, or a built-in template
//! - **Voice**: ElevenLabs (premium) or Google Translate TTS (free)
//! - **Images**: stock images keyed by the topic and fixed keywords
//! - **Video**: ffmpeg slideshow, fixed clip length per image
//! - **Publish**: YouTube resumable upload, Twitter status, TikTok stub
//!
//! Each integration is gated on its credentials (see [`Capabilities`]); a
//! missing key means a logged skip or a free fallback, never an error.
//!
//! # Example
//!
//! ```rust,no_run
//! use trendcast::{ConfigStore, HttpClient, Pipeline, Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigStore::default().load_or_create_interactive()?;
//!     let settings = Settings::load(None)?;
//!     let report = Pipeline::from_config(&config, &settings, HttpClient::new()?)
//!         .run()
//!         .await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod capability;
pub mod config;
pub mod error;
pub mod http_client;
pub mod images;
pub mod pipeline;
pub mod publish;
pub mod script;
pub mod topic;
pub mod types;
pub mod video;
pub mod voice;

pub use capability::{Capabilities, Capability};
pub use config::{Config, ConfigField, ConfigStore, Endpoints, Prompter, Settings};
pub use error::{PipelineError, Stage};
pub use http_client::HttpClient;
pub use pipeline::{ArtifactPaths, Pipeline, RunReport};
pub use publish::{Platform, Post, PublishOutcome, PublishResult, Publisher};
pub use types::{AudioAsset, ImageSet, Script, ScriptSource, Topic, VideoArtifact, VoiceEngine};

/// Version of trendcast
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
