//! Narration synthesis.
//!
//! Exactly one engine runs per script: ElevenLabs when its key is
//! configured, otherwise the free Google Translate voice. A premium
//! failure is fatal and never falls through to the free engine.

pub mod elevenlabs;
pub mod google;

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::capability::{Capability, ElevenLabsCredentials};
use crate::config::Settings;
use crate::http_client::HttpClient;
use crate::types::{AudioAsset, Script, VoiceEngine};

pub use elevenlabs::ElevenLabsVoice;
pub use google::{chunk_text, GoogleTranslateVoice};

/// Turns a script into an audio file.
#[async_trait]
pub trait VoiceSynthesizer: Send + Sync {
    /// Engine this synthesizer represents.
    fn engine(&self) -> VoiceEngine;

    /// Synthesize `script` into `output`, overwriting it.
    async fn synthesize(&self, script: &Script, output: &Path) -> Result<AudioAsset>;
}

/// Pick the synthesizer for the resolved voice capability.
#[must_use]
pub fn select_voice(
    capability: &Capability<ElevenLabsCredentials>,
    client: &HttpClient,
    settings: &Settings,
) -> Box<dyn VoiceSynthesizer> {
    match capability {
        Capability::Enabled(credentials) => Box::new(ElevenLabsVoice::new(
            client.clone(),
            &settings.endpoints.elevenlabs,
            &settings.voice_id,
            credentials.clone(),
        )),
        Capability::Disabled { .. } | Capability::NotImplemented => {
            Box::new(GoogleTranslateVoice::new(
                client.clone(),
                &settings.endpoints.google_tts,
                &settings.voice_language,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_selects_premium_engine() {
        let client = HttpClient::new().unwrap();
        let settings = Settings::default();
        let enabled = Capability::Enabled(ElevenLabsCredentials {
            api_key: "el".to_string(),
        });
        assert_eq!(
            select_voice(&enabled, &client, &settings).engine(),
            VoiceEngine::Premium
        );
    }

    #[test]
    fn missing_key_selects_free_engine() {
        let client = HttpClient::new().unwrap();
        let settings = Settings::default();
        let disabled = Capability::Disabled {
            missing: vec!["elevenlabs_api_key"],
        };
        assert_eq!(
            select_voice(&disabled, &client, &settings).engine(),
            VoiceEngine::Free
        );
    }
}
