//! Credential record stored in `config.json`.
//!
//! The record is captured interactively on the first run and loaded verbatim
//! on every run after that. There is no update path: delete the file to
//! start over.
//!
//! ```json
//! {"openai_api_key": "sk-...", "youtube_api_key": null, "affiliate_keyword": "technology", ...}
//! ```

pub mod settings;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use settings::{Endpoints, Settings};

/// Default location of the credential record, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Value stored for `affiliate_keyword` when the prompt is left empty.
pub const DEFAULT_AFFILIATE_KEYWORD: &str = "technology";

/// Flat credential and preference record. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub youtube_api_key: Option<String>,
    pub channel_id: Option<String>,
    pub affiliate_keyword: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub twitter_api_key: Option<String>,
    pub twitter_api_secret: Option<String>,
    pub twitter_access_token: Option<String>,
    pub twitter_access_secret: Option<String>,
    pub tiktok_username: Option<String>,
    pub tiktok_password: Option<String>,
}

/// One recognized field of [`Config`], in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    OpenAiApiKey,
    YouTubeApiKey,
    ChannelId,
    AffiliateKeyword,
    ElevenLabsApiKey,
    TwitterApiKey,
    TwitterApiSecret,
    TwitterAccessToken,
    TwitterAccessSecret,
    TikTokUsername,
    TikTokPassword,
}

impl ConfigField {
    /// Every field, in the order the first-run capture asks for them.
    pub const ALL: [ConfigField; 11] = [
        Self::OpenAiApiKey,
        Self::YouTubeApiKey,
        Self::ChannelId,
        Self::AffiliateKeyword,
        Self::ElevenLabsApiKey,
        Self::TwitterApiKey,
        Self::TwitterApiSecret,
        Self::TwitterAccessToken,
        Self::TwitterAccessSecret,
        Self::TikTokUsername,
        Self::TikTokPassword,
    ];

    /// JSON key used in `config.json`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::OpenAiApiKey => "openai_api_key",
            Self::YouTubeApiKey => "youtube_api_key",
            Self::ChannelId => "channel_id",
            Self::AffiliateKeyword => "affiliate_keyword",
            Self::ElevenLabsApiKey => "elevenlabs_api_key",
            Self::TwitterApiKey => "twitter_api_key",
            Self::TwitterApiSecret => "twitter_api_secret",
            Self::TwitterAccessToken => "twitter_access_token",
            Self::TwitterAccessSecret => "twitter_access_secret",
            Self::TikTokUsername => "tiktok_username",
            Self::TikTokPassword => "tiktok_password",
        }
    }

    /// Question shown during first-run capture.
    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Self::OpenAiApiKey => "OpenAI API key (Enter to use the template script): ",
            Self::YouTubeApiKey => "YouTube API key (Enter to skip uploads): ",
            Self::ChannelId => "YouTube channel ID (Enter to skip uploads): ",
            Self::AffiliateKeyword => "Affiliate product keyword (Enter for \"technology\"): ",
            Self::ElevenLabsApiKey => "ElevenLabs API key (Enter to use the free voice): ",
            Self::TwitterApiKey => "Twitter API key (Enter to skip posting): ",
            Self::TwitterApiSecret => "Twitter API secret (Enter to skip posting): ",
            Self::TwitterAccessToken => "Twitter access token (Enter to skip posting): ",
            Self::TwitterAccessSecret => "Twitter access secret (Enter to skip posting): ",
            Self::TikTokUsername => "TikTok username (Enter to skip): ",
            Self::TikTokPassword => "TikTok password (Enter to skip): ",
        }
    }
}

impl Config {
    /// Value of a field.
    #[must_use]
    pub fn get(&self, field: ConfigField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    fn slot(&self, field: ConfigField) -> &Option<String> {
        match field {
            ConfigField::OpenAiApiKey => &self.openai_api_key,
            ConfigField::YouTubeApiKey => &self.youtube_api_key,
            ConfigField::ChannelId => &self.channel_id,
            ConfigField::AffiliateKeyword => &self.affiliate_keyword,
            ConfigField::ElevenLabsApiKey => &self.elevenlabs_api_key,
            ConfigField::TwitterApiKey => &self.twitter_api_key,
            ConfigField::TwitterApiSecret => &self.twitter_api_secret,
            ConfigField::TwitterAccessToken => &self.twitter_access_token,
            ConfigField::TwitterAccessSecret => &self.twitter_access_secret,
            ConfigField::TikTokUsername => &self.tiktok_username,
            ConfigField::TikTokPassword => &self.tiktok_password,
        }
    }

    fn slot_mut(&mut self, field: ConfigField) -> &mut Option<String> {
        match field {
            ConfigField::OpenAiApiKey => &mut self.openai_api_key,
            ConfigField::YouTubeApiKey => &mut self.youtube_api_key,
            ConfigField::ChannelId => &mut self.channel_id,
            ConfigField::AffiliateKeyword => &mut self.affiliate_keyword,
            ConfigField::ElevenLabsApiKey => &mut self.elevenlabs_api_key,
            ConfigField::TwitterApiKey => &mut self.twitter_api_key,
            ConfigField::TwitterApiSecret => &mut self.twitter_api_secret,
            ConfigField::TwitterAccessToken => &mut self.twitter_access_token,
            ConfigField::TwitterAccessSecret => &mut self.twitter_access_secret,
            ConfigField::TikTokUsername => &mut self.tiktok_username,
            ConfigField::TikTokPassword => &mut self.tiktok_password,
        }
    }

    /// Affiliate keyword, falling back to the capture default.
    #[must_use]
    pub fn affiliate_keyword(&self) -> &str {
        self.affiliate_keyword
            .as_deref()
            .unwrap_or(DEFAULT_AFFILIATE_KEYWORD)
    }
}

/// Source of answers for the first-run capture.
pub trait Prompter {
    /// Ask one question and return the raw answer (possibly empty).
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// [`Prompter`] over any reader/writer pair.
pub struct IoPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> IoPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl IoPrompter<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr, read answers from stdin.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter for IoPrompter<R, W> {
    fn ask(&mut self, question: &str) -> Result<String> {
        self.output.write_all(question.as_bytes())?;
        self.output.flush()?;

        // EOF reads as an empty answer
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context("failed to read answer")?;
        Ok(line)
    }
}

/// Loads the credential record, creating it interactively on first run.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted record, or `None` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Config>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", self.path.display()))?;

        debug!(path = %self.path.display(), "Loaded config");
        Ok(Some(config))
    }

    /// Return the persisted record, or capture and persist a new one.
    ///
    /// An existing file is returned unmodified and the prompter is never
    /// touched. Otherwise every [`ConfigField`] is asked once, empty answers
    /// become `null`, and the record is written exactly once.
    pub fn load_or_create(&self, prompter: &mut dyn Prompter) -> Result<Config> {
        if let Some(config) = self.load()? {
            return Ok(config);
        }

        info!(path = %self.path.display(), "No config found, starting first-run setup");

        let mut config = Config::default();
        for field in ConfigField::ALL {
            let answer = prompter.ask(field.prompt())?;
            let answer = answer.trim();
            *config.slot_mut(field) = (!answer.is_empty()).then(|| answer.to_string());
        }

        if config.affiliate_keyword.is_none() {
            config.affiliate_keyword = Some(DEFAULT_AFFILIATE_KEYWORD.to_string());
        }

        self.save(&config)?;
        Ok(config)
    }

    /// Interactive [`load_or_create`](Self::load_or_create) on stdin/stderr.
    pub fn load_or_create_interactive(&self) -> Result<Config> {
        self.load_or_create(&mut IoPrompter::stdio())
    }

    fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        info!(path = %self.path.display(), "Saved config");
        Ok(())
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}
