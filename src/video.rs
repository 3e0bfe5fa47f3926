//! ffmpeg-based video assembly
//!
//! Every file in the image folder becomes one fixed-length clip. Clips are
//! letterboxed onto a common canvas ("compose" layout), concatenated in
//! image order, and muxed with the narration. The output length is
//! `seconds_per_image × image_count`: audio never extends, loops or
//! shortens the video.
//!
//! Image order is explicit: files named `image_{n}` sort by `n`, anything
//! else follows by file name. Directory listing order is never used.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::PipelineError;
use crate::types::VideoArtifact;

/// Renders a video from an image folder and an audio file.
#[async_trait]
pub trait VideoRenderer: Send + Sync {
    async fn assemble(&self, folder: &Path, audio: &Path, output: &Path) -> Result<VideoArtifact>;
}

/// Configuration for the assembler
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Path to ffmpeg binary
    pub ffmpeg_path: String,
    /// Length of each image clip
    pub seconds_per_image: u32,
    /// Output frame rate
    pub fps: u32,
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// Video codec
    pub video_codec: String,
    /// Audio codec
    pub audio_codec: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AssemblerConfig {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            ffmpeg_path: settings.ffmpeg_path.clone(),
            seconds_per_image: settings.seconds_per_image,
            fps: settings.fps,
            width: settings.canvas_width,
            height: settings.canvas_height,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

/// Everything needed to render one video; pure data, no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPlan {
    pub images: Vec<PathBuf>,
    pub audio: PathBuf,
    pub output: PathBuf,
    pub seconds_per_image: u32,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

impl VideoPlan {
    /// Length of the rendered video: one fixed clip per image.
    #[must_use]
    pub fn nominal_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.seconds_per_image) * self.images.len() as u64)
    }

    /// Filter graph scaling, padding and concatenating every clip.
    fn filter_complex(&self) -> String {
        let (w, h, fps) = (self.width, self.height, self.fps);
        let mut filters: Vec<String> = (0..self.images.len())
            .map(|i| {
                format!(
                    "[{i}:v]scale={w}:{h}:force_original_aspect_ratio=decrease,\
                     pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black,\
                     setsar=1,fps={fps},format=yuv420p[v{i}]"
                )
            })
            .collect();

        let inputs: String = (0..self.images.len()).map(|i| format!("[v{i}]")).collect();
        filters.push(format!(
            "{inputs}concat=n={}:v=1:a=0[outv]",
            self.images.len()
        ));
        filters.join(";")
    }

    /// Build ffmpeg arguments
    #[must_use]
    pub fn build_args(&self, config: &AssemblerConfig) -> Vec<String> {
        let mut args: Vec<String> = ["-hide_banner", "-loglevel", "warning", "-stats", "-y"]
            .iter()
            .map(std::string::ToString::to_string)
            .collect();

        // One looped still per clip
        for image in &self.images {
            args.extend([
                "-loop".to_string(),
                "1".to_string(),
                "-framerate".to_string(),
                self.fps.to_string(),
                "-t".to_string(),
                self.seconds_per_image.to_string(),
                "-i".to_string(),
                image.to_string_lossy().to_string(),
            ]);
        }

        // Narration is the last input
        args.push("-i".to_string());
        args.push(self.audio.to_string_lossy().to_string());

        args.push("-filter_complex".to_string());
        args.push(self.filter_complex());

        args.extend([
            "-map".to_string(),
            "[outv]".to_string(),
            "-map".to_string(),
            format!("{}:a", self.images.len()),
            "-c:v".to_string(),
            config.video_codec.clone(),
            "-c:a".to_string(),
            config.audio_codec.clone(),
            "-r".to_string(),
            self.fps.to_string(),
            // Cap at the clip total so longer narration is cut, never extends
            "-t".to_string(),
            self.nominal_duration().as_secs().to_string(),
        ]);

        args.push(self.output.to_string_lossy().to_string());
        args
    }
}

/// Order image files: `image_{n}` by `n`, then everything else by name.
#[must_use]
pub fn order_images(mut images: Vec<PathBuf>) -> Vec<PathBuf> {
    fn sequence(path: &Path) -> Option<u64> {
        let stem = path.file_stem()?.to_str()?;
        let digits = stem.strip_prefix("image_")?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    images.sort_by(|a, b| match (sequence(a), sequence(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.file_name().cmp(&b.file_name()),
    });
    images
}

/// List every regular file in `folder`, in image order.
pub async fn list_images(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(folder)
        .await
        .with_context(|| format!("failed to read {}", folder.display()))?;

    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            images.push(entry.path());
        }
    }

    Ok(order_images(images))
}

/// ffmpeg-backed [`VideoRenderer`]
pub struct VideoAssembler {
    config: AssemblerConfig,
}

impl VideoAssembler {
    #[must_use]
    pub fn with_config(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Check if ffmpeg is available
    pub async fn check_available(&self) -> bool {
        Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Plan a render of every image in `folder`.
    pub async fn plan(&self, folder: &Path, audio: &Path, output: &Path) -> Result<VideoPlan> {
        let images = list_images(folder).await?;
        if images.is_empty() {
            return Err(PipelineError::NoImages(folder.display().to_string()).into());
        }

        Ok(VideoPlan {
            images,
            audio: audio.to_path_buf(),
            output: output.to_path_buf(),
            seconds_per_image: self.config.seconds_per_image,
            fps: self.config.fps,
            width: self.config.width,
            height: self.config.height,
        })
    }

    /// Run ffmpeg for a plan
    pub async fn render(&self, plan: &VideoPlan) -> Result<()> {
        let args = plan.build_args(&self.config);
        debug!("ffmpeg args: {:?}", args);

        let status = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("failed to run {}", self.config.ffmpeg_path))?;

        if !status.success() {
            return Err(PipelineError::Ffmpeg(format!("exited with status: {status}")).into());
        }

        Ok(())
    }
}

impl Default for VideoAssembler {
    fn default() -> Self {
        Self::with_config(AssemblerConfig::default())
    }
}

#[async_trait]
impl VideoRenderer for VideoAssembler {
    async fn assemble(&self, folder: &Path, audio: &Path, output: &Path) -> Result<VideoArtifact> {
        info!("Creating video");
        let plan = self.plan(folder, audio, output).await?;
        info!(
            clips = plan.images.len(),
            seconds = plan.nominal_duration().as_secs(),
            "Rendering"
        );

        self.render(&plan).await?;

        info!(path = %output.display(), "Rendered video");
        Ok(VideoArtifact {
            path: output.to_path_buf(),
            clip_count: plan.images.len(),
            duration: plan.nominal_duration(),
        })
    }
}
