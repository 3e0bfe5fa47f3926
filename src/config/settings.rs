//! Pipeline settings loaded from `~/.config/trendcast/settings.toml`.
//!
//! Settings hold everything that is not a credential: artifact paths,
//! timing, voice and model choices, and service endpoints. The file is
//! optional and every key has a default.
//!
//! ```toml
//! image_dir = "images"
//! seconds_per_image = 5
//! fps = 24
//!
//! [endpoints]
//! trending_feed = "https://trends.google.com/trending/rss?geo=US"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Fallback topic when the trending feed answers with a non-success status.
pub const FALLBACK_TOPIC: &str = "Latest AI Technology Trends";

/// ElevenLabs voice id of "Rachel".
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8EDAcW";

/// Service endpoints. Overridable so the pipeline can be pointed at a stub.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Endpoints {
    /// RSS feed of trending searches.
    pub trending_feed: String,
    /// OpenAI API base (`/chat/completions` is appended).
    pub openai: String,
    /// ElevenLabs API base (`/text-to-speech/{voice}` is appended).
    pub elevenlabs: String,
    /// Google Translate TTS endpoint.
    pub google_tts: String,
    /// Stock image URL pattern; `{keyword}` is replaced per request.
    pub stock_images: String,
    /// YouTube resumable upload endpoint.
    pub youtube_upload: String,
    /// Twitter status endpoint.
    pub twitter: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            trending_feed: "https://trends.google.com/trending/rss?geo=US".to_string(),
            openai: "https://api.openai.com/v1".to_string(),
            elevenlabs: "https://api.elevenlabs.io/v1".to_string(),
            google_tts: "https://translate.google.com/translate_tts".to_string(),
            stock_images: "https://source.unsplash.com/1280x720/?{keyword}".to_string(),
            youtube_upload: "https://www.googleapis.com/upload/youtube/v3/videos".to_string(),
            twitter: "https://api.twitter.com/2/tweets".to_string(),
        }
    }
}

impl Endpoints {
    /// Every endpoint rebased onto one origin (e.g. `http://127.0.0.1:8080`).
    ///
    /// Paths are kept so a single stub server can tell the services apart.
    #[must_use]
    pub fn rebased(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            trending_feed: format!("{origin}/trends/rss"),
            openai: format!("{origin}/openai/v1"),
            elevenlabs: format!("{origin}/elevenlabs/v1"),
            google_tts: format!("{origin}/translate_tts"),
            stock_images: format!("{origin}/images/?{{keyword}}"),
            youtube_upload: format!("{origin}/upload/youtube/v3/videos"),
            twitter: format!("{origin}/twitter/2/tweets"),
        }
    }
}

/// Non-credential pipeline settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Folder the stock images are written to (never cleaned).
    pub image_dir: PathBuf,
    /// Narration output file.
    pub audio_file: PathBuf,
    /// Rendered video, overwritten each run.
    pub video_file: PathBuf,
    /// Duration of each image clip, in seconds.
    pub seconds_per_image: u32,
    /// Output frame rate.
    pub fps: u32,
    /// Canvas the images are composed onto.
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Static keywords fetched after the topic-keyed image.
    pub image_keywords: Vec<String>,
    /// ElevenLabs voice id.
    pub voice_id: String,
    /// Language of the free voice.
    pub voice_language: String,
    /// Chat model used for the script.
    pub openai_model: String,
    /// Path to the ffmpeg binary.
    pub ffmpeg_path: String,
    pub endpoints: Endpoints,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("images"),
            audio_file: PathBuf::from("voice.mp3"),
            video_file: PathBuf::from("video.mp4"),
            seconds_per_image: 5,
            fps: 24,
            canvas_width: 1280,
            canvas_height: 720,
            image_keywords: vec!["technology".to_string(), "news".to_string()],
            voice_id: DEFAULT_VOICE_ID.to_string(),
            voice_language: "en".to_string(),
            openai_model: "gpt-4".to_string(),
            ffmpeg_path: which::which("ffmpeg").map_or_else(
                |_| "ffmpeg".to_string(),
                |p| p.to_string_lossy().to_string(),
            ),
            endpoints: Endpoints::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// Returns defaults if the file doesn't exist (settings are optional).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(default_settings_path, Path::to_path_buf);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        Self::from_toml(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Return the path to the default settings file.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trendcast")
        .join("settings.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_settings() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.seconds_per_image, 5);
        assert_eq!(settings.fps, 24);
        assert_eq!(settings.image_keywords, vec!["technology", "news"]);
        assert_eq!(settings.voice_id, DEFAULT_VOICE_ID);
        assert_eq!(settings.endpoints, Endpoints::default());
    }

    #[test]
    fn parse_partial_settings() {
        let toml_str = r#"
fps = 30
video_file = "out/final.mp4"

[endpoints]
openai = "http://localhost:9000/v1"
"#;
        let settings = Settings::from_toml(toml_str).unwrap();
        assert_eq!(settings.fps, 30);
        assert_eq!(settings.video_file, PathBuf::from("out/final.mp4"));
        assert_eq!(settings.endpoints.openai, "http://localhost:9000/v1");
        assert_eq!(
            settings.endpoints.twitter,
            Endpoints::default().twitter,
            "unset endpoints keep their defaults"
        );
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Settings::from_toml("fps = \"fast\"").is_err());
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.audio_file, PathBuf::from("voice.mp3"));
    }

    #[test]
    fn rebased_endpoints_share_origin() {
        let endpoints = Endpoints::rebased("http://127.0.0.1:4000/");
        assert_eq!(endpoints.openai, "http://127.0.0.1:4000/openai/v1");
        assert_eq!(endpoints.stock_images, "http://127.0.0.1:4000/images/?{keyword}");
    }
}
