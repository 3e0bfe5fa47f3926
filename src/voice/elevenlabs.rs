//! ElevenLabs text-to-speech (premium voice).

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument};

use super::VoiceSynthesizer;
use crate::capability::ElevenLabsCredentials;
use crate::http_client::{ensure_success, HttpClient};
use crate::types::{AudioAsset, Script, VoiceEngine};

const MODEL_ID: &str = "eleven_monolingual_v1";

/// Premium synthesizer with a fixed voice
pub struct ElevenLabsVoice {
    client: HttpClient,
    api_base: String,
    voice_id: String,
    credentials: ElevenLabsCredentials,
}

impl ElevenLabsVoice {
    pub fn new(
        client: HttpClient,
        api_base: &str,
        voice_id: &str,
        credentials: ElevenLabsCredentials,
    ) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            voice_id: voice_id.to_string(),
            credentials,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/text-to-speech/{}", self.api_base, self.voice_id)
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[async_trait]
impl VoiceSynthesizer for ElevenLabsVoice {
    fn engine(&self) -> VoiceEngine {
        VoiceEngine::Premium
    }

    #[instrument(skip_all, fields(voice = %self.voice_id))]
    async fn synthesize(&self, script: &Script, output: &Path) -> Result<AudioAsset> {
        info!(chars = script.text.len(), "Generating voiceover (ElevenLabs)");

        let response = self
            .client
            .post(&self.endpoint())
            .header("xi-api-key", &self.credentials.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&SpeechRequest {
                text: &script.text,
                model_id: MODEL_ID,
            })
            .send()
            .await
            .context("ElevenLabs request failed")?;
        let response = ensure_success(response, "ElevenLabs").await?;

        let audio = response
            .bytes()
            .await
            .context("Failed to read ElevenLabs audio")?;
        tokio::fs::write(output, &audio)
            .await
            .with_context(|| format!("failed to write {}", output.display()))?;

        info!(bytes = audio.len(), path = %output.display(), "Saved voiceover");
        Ok(AudioAsset {
            path: output.to_path_buf(),
            engine: VoiceEngine::Premium,
            bytes: audio.len() as u64,
        })
    }
}
