//! Google Cloud Text-to-Speech client.
//!
//! # API Reference
//!
//! - Endpoint: `POST https://texttospeech.googleapis.com/v1/text:synthesize`
//! - Voices: Chirp 3 HD (`en-US-Chirp3-HD-<Name>`); the UI sends short names
//! - Output: MP3, returned as base64 in `audioContent`
//! - Auth: OAuth2 bearer token, billed to `x-goog-user-project`

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::auth::TokenProvider;
use super::base::{SpeechSynthesizer, SynthesizeRequest, SynthesizeResponse, TTSError, TTSResult};
use crate::utils::with_cancellation;

/// Google Cloud TTS synthesize endpoint
pub const GOOGLE_TTS_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";
pub const DEFAULT_VOICE: &str = "Charon";
pub const DEFAULT_VOICE_FAMILY: &str = "Chirp3-HD";

/// Speaking rate used when the caller gives none or a non-positive one.
pub const DEFAULT_SPEAKING_RATE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GoogleTtsConfig {
    /// Project billed for the request (`GOOGLE_CLOUD_PROJECT`)
    pub project_id: String,
    pub api_url: String,
    pub language_code: String,
    pub default_voice: String,
    pub voice_family: String,
}

impl Default for GoogleTtsConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            api_url: GOOGLE_TTS_URL.to_string(),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            default_voice: DEFAULT_VOICE.to_string(),
            voice_family: DEFAULT_VOICE_FAMILY.to_string(),
        }
    }
}

impl GoogleTtsConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Default::default()
        }
    }

    /// Expand a short voice name into a fully qualified one.
    ///
    /// `Charon` becomes `en-US-Chirp3-HD-Charon`; names already carrying the
    /// language prefix pass through unchanged.
    pub fn resolve_voice_name(&self, voice: Option<&str>) -> String {
        let short = voice.map(str::trim).filter(|v| !v.is_empty());
        let short = short.unwrap_or_else(|| self.default_voice.trim());

        let language_prefix = format!("{}-", self.language_code);
        if short.starts_with(&language_prefix) {
            short.to_string()
        } else {
            format!("{}-{}-{}", self.language_code, self.voice_family, short)
        }
    }
}

/// Clamp missing, zero, negative or non-finite rates to the default.
pub fn normalize_speaking_rate(rate: Option<f32>) -> f32 {
    match rate {
        Some(r) if r.is_finite() && r > 0.0 => r,
        _ => DEFAULT_SPEAKING_RATE,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeBody<'a> {
    input: InputBody<'a>,
    voice: VoiceBody<'a>,
    audio_config: AudioConfigBody,
}

#[derive(Debug, Serialize)]
struct InputBody<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceBody<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfigBody {
    audio_encoding: &'static str,
    speaking_rate: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeApiResponse {
    #[serde(default)]
    audio_content: Option<String>,
}

/// [`SpeechSynthesizer`] backed by Google Cloud Text-to-Speech.
pub struct GoogleTts {
    config: GoogleTtsConfig,
    client: Client,
    token_provider: Arc<dyn TokenProvider>,
}

impl GoogleTts {
    pub fn new(config: GoogleTtsConfig, token_provider: Arc<dyn TokenProvider>) -> TTSResult<Self> {
        if config.project_id.trim().is_empty() {
            return Err(TTSError::InvalidConfiguration(
                "GOOGLE_CLOUD_PROJECT not set".to_string(),
            ));
        }

        let client = Client::builder().build().map_err(|e| {
            TTSError::InvalidConfiguration(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            config,
            client,
            token_provider,
        })
    }

    pub fn config(&self) -> &GoogleTtsConfig {
        &self.config
    }

    async fn call_api(
        &self,
        text: &str,
        voice_name: &str,
        speaking_rate: f32,
    ) -> TTSResult<SynthesizeResponse> {
        let token = self.token_provider.access_token().await?;
        if token.trim().is_empty() {
            return Err(TTSError::Authentication(
                "failed to get access token from ADC".to_string(),
            ));
        }

        let body = SynthesizeBody {
            input: InputBody { text },
            voice: VoiceBody {
                language_code: &self.config.language_code,
                name: voice_name,
            },
            audio_config: AudioConfigBody {
                audio_encoding: "MP3",
                speaking_rate,
            },
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(token.trim())
            .header("x-goog-user-project", &self.config.project_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Google TTS request failed");
                TTSError::NetworkError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Google TTS returned error");
            return Err(TTSError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SynthesizeApiResponse = response
            .json()
            .await
            .map_err(|e| TTSError::InvalidResponse(format!("decode tts response: {e}")))?;

        let audio_base64 = parsed
            .audio_content
            .filter(|audio| !audio.is_empty())
            .ok_or_else(|| {
                TTSError::InvalidResponse("missing audioContent in tts response".to_string())
            })?;

        let audio_len = STANDARD
            .decode(&audio_base64)
            .map_err(|e| TTSError::InvalidResponse(format!("decode base64 audioContent: {e}")))?
            .len();

        info!(voice = %voice_name, audio_bytes = audio_len, "Synthesized speech");

        Ok(SynthesizeResponse { audio_base64 })
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(
        &self,
        request: &SynthesizeRequest,
        cancel: Option<&CancellationToken>,
    ) -> TTSResult<SynthesizeResponse> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(TTSError::InvalidRequest("empty text".to_string()));
        }

        let speaking_rate = normalize_speaking_rate(request.speaking_rate);
        let voice_name = self.config.resolve_voice_name(request.voice.as_deref());

        // Chirp 3 HD has no style field; the prompt is kept for the logs.
        debug!(
            voice = %voice_name,
            speaking_rate,
            emotion = %request.emotion,
            style_prompt = request.style_prompt().as_deref().unwrap_or(""),
            text_len = text.len(),
            "Synthesizing text with Google TTS"
        );

        with_cancellation(cancel, self.call_api(text, &voice_name, speaking_rate))
            .await
            .unwrap_or(Err(TTSError::Cancelled))
    }
}
