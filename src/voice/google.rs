//! Free narration via the Google Translate TTS endpoint.
//!
//! The endpoint accepts at most 100 characters per request, so the script
//! is split on word boundaries and the returned MP3 frames are appended
//! into one file.

use std::path::Path;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, instrument};
use url::Url;

use super::VoiceSynthesizer;
use crate::http_client::{ensure_success, HttpClient};
use crate::types::{AudioAsset, Script, VoiceEngine};

/// Longest text the endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Free synthesizer with a fixed language
pub struct GoogleTranslateVoice {
    client: HttpClient,
    endpoint: String,
    language: String,
}

impl GoogleTranslateVoice {
    pub fn new(client: HttpClient, endpoint: &str, language: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            language: language.to_string(),
        }
    }

    fn chunk_url(&self, chunk: &str, idx: usize, total: usize) -> Result<Url> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();
        Url::parse_with_params(
            &self.endpoint,
            [
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", self.language.as_str()),
                ("client", "tw-ob"),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ],
        )
        .with_context(|| format!("invalid TTS endpoint {}", self.endpoint))
    }
}

#[async_trait]
impl VoiceSynthesizer for GoogleTranslateVoice {
    fn engine(&self) -> VoiceEngine {
        VoiceEngine::Free
    }

    #[instrument(skip_all, fields(lang = %self.language))]
    async fn synthesize(&self, script: &Script, output: &Path) -> Result<AudioAsset> {
        let chunks = chunk_text(&script.text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            bail!("script is empty, nothing to synthesize");
        }
        info!(chunks = chunks.len(), "Generating voiceover (free voice)");

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.chunk_url(chunk, idx, chunks.len())?;
            debug!(idx, chars = chunk.len(), "Fetching TTS chunk");

            let response = self
                .client
                .inner()
                .get(url)
                .send()
                .await
                .context("TTS request failed")?;
            let response = ensure_success(response, "Google TTS").await?;
            audio.extend_from_slice(&response.bytes().await.context("Failed to read TTS audio")?);
        }

        tokio::fs::write(output, &audio)
            .await
            .with_context(|| format!("failed to write {}", output.display()))?;

        info!(bytes = audio.len(), path = %output.display(), "Saved voiceover");
        Ok(AudioAsset {
            path: output.to_path_buf(),
            engine: VoiceEngine::Free,
            bytes: audio.len() as u64,
        })
    }
}

/// Split text into chunks of at most `max_chars` characters.
///
/// Words are packed greedily; a single word longer than `max_chars` is
/// split mid-word. Whitespace runs collapse to one space.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
