//! Pipeline error type.

use thiserror::Error;

/// A stage of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Topic,
    Script,
    Voice,
    Images,
    Video,
    Publish,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Config => "config",
            Self::Topic => "topic",
            Self::Script => "script",
            Self::Voice => "voice",
            Self::Images => "images",
            Self::Video => "video",
            Self::Publish => "publish",
        };
        f.write_str(name)
    }
}

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A stage failed; the run stops here and nothing later executes.
    #[error("{stage} stage failed: {source:#}")]
    StageFailed {
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },

    #[error("ffmpeg error: {0}")]
    Ffmpeg(String),

    #[error("no images found in {0}")]
    NoImages(String),

    #[error("trending feed contained no titles")]
    EmptyFeed,
}

impl PipelineError {
    /// Stage that failed, if known.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Attach a [`Stage`] to a stage result.
pub trait StageContext<T> {
    fn stage(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T> StageContext<T> for anyhow::Result<T> {
    fn stage(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|source| PipelineError::StageFailed { stage, source })
    }
}
