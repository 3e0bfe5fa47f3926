//! Artifacts handed from one stage to the next.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Trending topic driving a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a script's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSource {
    /// Chat-completion response.
    Model,
    /// Built-in template (no model credential).
    Template,
}

/// Narration for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub topic: Topic,
    pub text: String,
    pub source: ScriptSource,
}

/// Which synthesizer produced an audio file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceEngine {
    /// ElevenLabs.
    Premium,
    /// Google Translate TTS.
    Free,
}

impl fmt::Display for VoiceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Premium => f.write_str("premium"),
            Self::Free => f.write_str("free"),
        }
    }
}

/// Synthesized narration on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset {
    pub path: PathBuf,
    pub engine: VoiceEngine,
    pub bytes: u64,
}

/// Images written for one topic, in fetch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    pub folder: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Rendered video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoArtifact {
    pub path: PathBuf,
    /// Number of image clips concatenated.
    pub clip_count: usize,
    /// `seconds_per_image × clip_count`, independent of the audio length.
    pub duration: Duration,
}
