//! End-to-end run: topic → script → narration → images → video → publish.
//!
//! Stages run strictly in sequence on the calling task. The first stage
//! error aborts the run; artifacts already written stay on disk. The only
//! branching is inside each stage, driven by its [`Capability`].
//!
//! [`Capability`]: crate::capability::Capability

use std::fmt;
use std::path::PathBuf;

use tracing::info;

use crate::capability::Capabilities;
use crate::config::{Config, Settings};
use crate::error::{PipelineError, Stage, StageContext};
use crate::http_client::HttpClient;
use crate::images::{ImageCollector, ImageSource};
use crate::publish::{
    Post, PublishResult, Publisher, TikTokPublisher, TwitterPublisher, YouTubePublisher,
};
use crate::script::{ScriptGenerator, ScriptWriter};
use crate::topic::{TopicSource, TrendingFeed};
use crate::types::{ScriptSource, Topic, VideoArtifact, VoiceEngine};
use crate::video::{AssemblerConfig, VideoAssembler, VideoRenderer};
use crate::voice::{select_voice, VoiceSynthesizer};

/// Fixed artifact locations shared by every run in a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub image_dir: PathBuf,
    pub audio_file: PathBuf,
    pub video_file: PathBuf,
}

impl ArtifactPaths {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            image_dir: settings.image_dir.clone(),
            audio_file: settings.audio_file.clone(),
            video_file: settings.video_file.clone(),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub topic: Topic,
    pub script_source: ScriptSource,
    pub voice_engine: VoiceEngine,
    pub image_count: usize,
    pub video: VideoArtifact,
    pub published: Vec<PublishResult>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let script = match self.script_source {
            ScriptSource::Model => "model",
            ScriptSource::Template => "template",
        };
        writeln!(f, "Topic:  {}", self.topic)?;
        writeln!(f, "Script: {script}")?;
        writeln!(f, "Voice:  {}", self.voice_engine)?;
        writeln!(f, "Images: {}", self.image_count)?;
        writeln!(
            f,
            "Video:  {} ({} clips, {}s)",
            self.video.path.display(),
            self.video.clip_count,
            self.video.duration.as_secs()
        )?;
        for result in &self.published {
            writeln!(f, "  {result}")?;
        }
        Ok(())
    }
}

/// Wired stages for one run.
pub struct Pipeline {
    topics: Box<dyn TopicSource>,
    writer: Box<dyn ScriptWriter>,
    voice: Box<dyn VoiceSynthesizer>,
    images: Box<dyn ImageSource>,
    renderer: Box<dyn VideoRenderer>,
    publishers: Vec<Box<dyn Publisher>>,
    paths: ArtifactPaths,
}

impl Pipeline {
    /// Build the production stages from credentials and settings.
    ///
    /// Capabilities are resolved here, once; stages never look at the
    /// config again.
    #[must_use]
    pub fn from_config(config: &Config, settings: &Settings, client: HttpClient) -> Self {
        let caps = Capabilities::resolve(config);
        let endpoints = &settings.endpoints;

        let publishers: Vec<Box<dyn Publisher>> = vec![
            Box::new(YouTubePublisher::new(
                client.clone(),
                &endpoints.youtube_upload,
                caps.youtube,
            )),
            Box::new(TwitterPublisher::new(
                client.clone(),
                &endpoints.twitter,
                caps.twitter,
            )),
            Box::new(TikTokPublisher::new(caps.tiktok)),
        ];

        Self {
            topics: Box::new(TrendingFeed::new(client.clone(), &endpoints.trending_feed)),
            writer: Box::new(ScriptGenerator::new(
                client.clone(),
                &endpoints.openai,
                &settings.openai_model,
                caps.script,
            )),
            voice: select_voice(&caps.voice, &client, settings),
            images: Box::new(ImageCollector::new(
                client,
                &endpoints.stock_images,
                settings.image_keywords.clone(),
            )),
            renderer: Box::new(VideoAssembler::with_config(AssemblerConfig::from_settings(
                settings,
            ))),
            publishers,
            paths: ArtifactPaths::from_settings(settings),
        }
    }

    #[must_use]
    pub fn with_topic_source(mut self, topics: Box<dyn TopicSource>) -> Self {
        self.topics = topics;
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn VideoRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    #[must_use]
    pub fn with_publishers(mut self, publishers: Vec<Box<dyn Publisher>>) -> Self {
        self.publishers = publishers;
        self
    }

    /// Execute every stage once.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let topic = self
            .topics
            .pick_trending_topic()
            .await
            .stage(Stage::Topic)?;
        info!(%topic, "Selected topic");

        let script = self.writer.generate(&topic).await.stage(Stage::Script)?;
        info!(chars = script.text.len(), source = ?script.source, "Script ready");

        let audio = self
            .voice
            .synthesize(&script, &self.paths.audio_file)
            .await
            .stage(Stage::Voice)?;
        info!(engine = %audio.engine, bytes = audio.bytes, "Narration ready");

        let images = self
            .images
            .collect(&topic, &self.paths.image_dir)
            .await
            .stage(Stage::Images)?;

        let video = self
            .renderer
            .assemble(
                &self.paths.image_dir,
                &audio.path,
                &self.paths.video_file,
            )
            .await
            .stage(Stage::Video)?;
        info!(path = %video.path.display(), clips = video.clip_count, "Video ready");

        let mut post = Post::new(topic.clone(), video.path.clone());
        let mut published = Vec::with_capacity(self.publishers.len());
        for publisher in &self.publishers {
            let result = publisher.publish(&post).await.stage(Stage::Publish)?;
            if post.link.is_none() {
                post.link = result.url().map(String::from);
            }
            published.push(result);
        }

        Ok(RunReport {
            topic,
            script_source: script.source,
            voice_engine: audio.engine,
            image_count: images.files.len(),
            video,
            published,
        })
    }
}
