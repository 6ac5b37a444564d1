//! Speech synthesis against an ElevenLabs-style text-to-speech endpoint.

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

use super::{AdapterError, Result};
use crate::types::{estimated_spoken_seconds, word_count, Language, VoiceStyle};

const PROVIDER: &str = "elevenlabs";
const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
const MODEL_ID: &str = "eleven_flash_v2_5";

/// A synthesized audio rendition.
///
/// The estimated duration is the same word-count heuristic used for pitch
/// drafts; the provider does not report measured audio length.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    pub audio: Vec<u8>,
    pub media_type: String,
    pub estimated_seconds: u64,
}

impl fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioClip")
            .field("bytes", &self.audio.len())
            .field("media_type", &self.media_type)
            .field("estimated_seconds", &self.estimated_seconds)
            .finish()
    }
}

/// Boundary contract for speech synthesis.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        language: Language,
        style: VoiceStyle,
    ) -> Result<AudioClip>;
}

/// Provider voice id for a style.
#[must_use]
pub fn voice_id(style: VoiceStyle) -> &'static str {
    match style {
        VoiceStyle::ExecutiveMale => "JBFqnCBsd6RMkjVDRZzb", // George
        VoiceStyle::ExecutiveFemale => "21m00Tcm4TlvDq8ikWAM", // Rachel
        VoiceStyle::PresenterMale => "ErXwobaYiN019PkySvjV", // Antoni
        VoiceStyle::PresenterFemale => "AZnzlk1XvdvUeBnXmlld", // Domi
    }
}

/// Text-to-speech [`SpeechSynthesizer`].
#[derive(Clone, Debug)]
pub struct ElevenLabsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    model_id: &'static str,
    language_code: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

impl ElevenLabsClient {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Overrides the API base URL (test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    #[instrument(skip(self, text), fields(provider = PROVIDER, %language, %style, chars = text.len()))]
    async fn synthesize(
        &self,
        text: &str,
        language: Language,
        style: VoiceStyle,
    ) -> Result<AudioClip> {
        let body = SynthesizeRequest {
            text,
            model_id: MODEL_ID,
            language_code: language.code(),
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.75,
            },
        };
        let resp = self
            .http
            .post(format!(
                "{}/v1/text-to-speech/{}",
                self.base_url,
                voice_id(style)
            ))
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AdapterError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        // The endpoint streams the encoded audio; accumulate the chunks.
        let mut audio = Vec::new();
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            audio.extend_from_slice(&chunk?);
        }
        if audio.is_empty() {
            return Err(AdapterError::Provider {
                provider: PROVIDER,
                message: "empty audio stream".to_string(),
            });
        }

        debug!(bytes = audio.len(), "audio synthesized");
        Ok(AudioClip {
            audio,
            media_type: "audio/mpeg".to_string(),
            estimated_seconds: estimated_spoken_seconds(word_count(text)),
        })
    }
}
