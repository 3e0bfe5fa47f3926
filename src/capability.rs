//! Presence-gated integrations.
//!
//! Each external integration is resolved once from the loaded [`Config`]
//! into a [`Capability`]: either enabled with the credentials it needs, or
//! disabled with the names of the missing fields. Stages match on the
//! capability instead of re-checking `Option`s.

use crate::config::{Config, ConfigField};

/// Whether an integration can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability<T> {
    /// All required credentials are present.
    Enabled(T),
    /// At least one required credential is missing.
    Disabled { missing: Vec<&'static str> },
    /// Credentials are present but this build has no client for the service.
    NotImplemented,
}

impl<T> Capability<T> {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// Short label for status output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Enabled(_) => "enabled",
            Self::Disabled { .. } => "disabled",
            Self::NotImplemented => "not implemented",
        }
    }
}

/// Chat-completion credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiCredentials {
    pub api_key: String,
}

/// Premium voice credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevenLabsCredentials {
    pub api_key: String,
}

/// Video upload credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YouTubeCredentials {
    pub api_key: String,
    pub channel_id: String,
}

/// OAuth 1.0a user-context credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct TwitterCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl std::fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("api_key", &self.api_key)
            .field("access_token", &self.access_token)
            .finish_non_exhaustive()
    }
}

/// Short-video platform credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TikTokCredentials {
    pub username: String,
    pub password: Option<String>,
}

/// Every integration, resolved once per run.
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub script: Capability<OpenAiCredentials>,
    pub voice: Capability<ElevenLabsCredentials>,
    pub youtube: Capability<YouTubeCredentials>,
    pub twitter: Capability<TwitterCredentials>,
    /// Never `Enabled`: a configured username resolves to `NotImplemented`.
    pub tiktok: Capability<TikTokCredentials>,
}

impl Capabilities {
    #[must_use]
    pub fn resolve(config: &Config) -> Self {
        Self {
            script: require(config, &[ConfigField::OpenAiApiKey]).map_enabled(|v| {
                OpenAiCredentials {
                    api_key: v[0].clone(),
                }
            }),
            voice: require(config, &[ConfigField::ElevenLabsApiKey]).map_enabled(|v| {
                ElevenLabsCredentials {
                    api_key: v[0].clone(),
                }
            }),
            youtube: require(config, &[ConfigField::YouTubeApiKey, ConfigField::ChannelId])
                .map_enabled(|v| YouTubeCredentials {
                    api_key: v[0].clone(),
                    channel_id: v[1].clone(),
                }),
            twitter: require(
                config,
                &[
                    ConfigField::TwitterApiKey,
                    ConfigField::TwitterApiSecret,
                    ConfigField::TwitterAccessToken,
                    ConfigField::TwitterAccessSecret,
                ],
            )
            .map_enabled(|v| TwitterCredentials {
                api_key: v[0].clone(),
                api_secret: v[1].clone(),
                access_token: v[2].clone(),
                access_secret: v[3].clone(),
            }),
            tiktok: match require(config, &[ConfigField::TikTokUsername]) {
                Capability::Enabled(_) => Capability::NotImplemented,
                Capability::Disabled { missing } => Capability::Disabled { missing },
                Capability::NotImplemented => Capability::NotImplemented,
            },
        }
    }
}

impl Capability<Vec<String>> {
    fn map_enabled<U>(self, f: impl FnOnce(&[String]) -> U) -> Capability<U> {
        match self {
            Self::Enabled(values) => Capability::Enabled(f(&values)),
            Self::Disabled { missing } => Capability::Disabled { missing },
            Self::NotImplemented => Capability::NotImplemented,
        }
    }
}

/// Non-blank value of `field`.
fn present(config: &Config, field: ConfigField) -> Option<&str> {
    config.get(field).filter(|v| !v.trim().is_empty())
}

/// Collect the values of `fields`, or the keys of those that are missing.
///
/// Blank strings count as missing.
fn require(config: &Config, fields: &[ConfigField]) -> Capability<Vec<String>> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|f| present(config, **f).is_none())
        .map(|f| f.key())
        .collect();

    if !missing.is_empty() {
        return Capability::Disabled { missing };
    }

    Capability::Enabled(
        fields
            .iter()
            .filter_map(|f| present(config, *f).map(String::from))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(openai: bool, eleven: bool) -> Config {
        Config {
            openai_api_key: openai.then(|| "sk".to_string()),
            elevenlabs_api_key: eleven.then(|| "el".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn empty_config_disables_everything() {
        let caps = Capabilities::resolve(&Config::default());
        assert!(!caps.script.is_enabled());
        assert!(!caps.voice.is_enabled());
        assert_eq!(
            caps.youtube,
            Capability::Disabled {
                missing: vec!["youtube_api_key", "channel_id"]
            }
        );
        assert!(matches!(caps.twitter, Capability::Disabled { ref missing } if missing.len() == 4));
        assert_eq!(
            caps.tiktok,
            Capability::Disabled {
                missing: vec!["tiktok_username"]
            }
        );
    }

    #[test]
    fn present_keys_enable_script_and_voice() {
        let caps = Capabilities::resolve(&config_with(true, true));
        assert_eq!(
            caps.script,
            Capability::Enabled(OpenAiCredentials {
                api_key: "sk".to_string()
            })
        );
        assert!(caps.voice.is_enabled());
        assert!(!caps.youtube.is_enabled());
    }

    #[test]
    fn youtube_needs_key_and_channel() {
        let config = Config {
            youtube_api_key: Some("yt".to_string()),
            ..Config::default()
        };
        let caps = Capabilities::resolve(&config);
        assert_eq!(
            caps.youtube,
            Capability::Disabled {
                missing: vec!["channel_id"]
            }
        );
    }

    #[test]
    fn partial_twitter_tuple_stays_disabled() {
        let config = Config {
            twitter_api_key: Some("k".to_string()),
            twitter_api_secret: Some("s".to_string()),
            ..Config::default()
        };
        let caps = Capabilities::resolve(&config);
        assert_eq!(
            caps.twitter,
            Capability::Disabled {
                missing: vec!["twitter_access_token", "twitter_access_secret"]
            }
        );
    }

    #[test]
    fn blank_values_count_as_missing() {
        let config = Config {
            openai_api_key: Some(String::new()),
            elevenlabs_api_key: Some("  ".to_string()),
            youtube_api_key: Some(String::new()),
            channel_id: Some(String::new()),
            twitter_api_key: Some("k".to_string()),
            twitter_api_secret: Some("s".to_string()),
            twitter_access_token: Some("t".to_string()),
            twitter_access_secret: Some(String::new()),
            tiktok_username: Some(String::new()),
            ..Config::default()
        };
        let caps = Capabilities::resolve(&config);
        assert!(!caps.script.is_enabled());
        assert!(!caps.voice.is_enabled());
        assert_eq!(
            caps.youtube,
            Capability::Disabled {
                missing: vec!["youtube_api_key", "channel_id"]
            }
        );
        assert_eq!(
            caps.twitter,
            Capability::Disabled {
                missing: vec!["twitter_access_secret"]
            }
        );
        assert!(matches!(caps.tiktok, Capability::Disabled { .. }));
    }

    #[test]
    fn tiktok_username_means_not_implemented() {
        let config = Config {
            tiktok_username: Some("creator".to_string()),
            ..Config::default()
        };
        let caps = Capabilities::resolve(&config);
        assert_eq!(caps.tiktok, Capability::NotImplemented);
        assert_eq!(caps.tiktok.label(), "not implemented");
    }
}
