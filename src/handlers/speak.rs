//! Text-to-speech REST API
//!
//! # API Reference
//!
//! `POST /tts/speak`
//!
//! ```json
//! { "text": "Time for your evening pills", "voice": "Charon", "speakingRate": 0.9,
//!   "emotion": "calm", "prompt": "Speak slowly" }
//! ```
//!
//! Answers `{"audioBase64": "..."}` with MP3 audio, or `{"ok": false, "error": "..."}`.
//! Returns 503 when no Google Cloud project is configured.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::error::{ApiError, ApiResult};
use crate::core::tts::{Emotion, SpeechSynthesizer, SynthesizeRequest, SynthesizeResponse};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakRequest {
    #[serde(default)]
    pub text: String,
    pub voice: Option<String>,
    pub speaking_rate: Option<f32>,
    pub emotion: Option<String>,
    pub prompt: Option<String>,
}

impl From<SpeakRequest> for SynthesizeRequest {
    fn from(request: SpeakRequest) -> Self {
        SynthesizeRequest {
            text: request.text,
            voice: request.voice,
            speaking_rate: request.speaking_rate,
            emotion: request
                .emotion
                .as_deref()
                .map(Emotion::from_str_or_default)
                .unwrap_or_default(),
            prompt: request.prompt,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakResponse {
    pub audio_base64: String,
}

pub(crate) fn speech_client(state: &AppState) -> ApiResult<&Arc<dyn SpeechSynthesizer>> {
    state
        .tts
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("speech synthesis not configured"))
}

/// Synthesize, archive and return a clip using the request-scoped token.
pub(crate) async fn synthesize(
    state: &AppState,
    request: &SynthesizeRequest,
) -> ApiResult<SynthesizeResponse> {
    let client = speech_client(state)?;
    let cancel = state.request_token();
    let response = client.synthesize(request, Some(&cancel)).await?;
    state.archive_audio(&response).await;
    Ok(response)
}

/// Convert text to speech.
pub async fn speak_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpeakRequest>, JsonRejection>,
) -> ApiResult<Json<SpeakResponse>> {
    let Json(request) = payload?;
    let request = SynthesizeRequest::from(request);

    let response = synthesize(&state, &request).await?;
    info!(
        "Synthesized {} chars into {} base64 bytes",
        request.text.len(),
        response.audio_base64.len()
    );

    Ok(Json(SpeakResponse {
        audio_base64: response.audio_base64,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speak_request_conversion() {
        let request: SpeakRequest = serde_json::from_str(
            r#"{"text":"hello","voice":"Puck","speakingRate":0.8,"emotion":"URGENT","prompt":"slow"}"#,
        )
        .unwrap();
        let synth = SynthesizeRequest::from(request);

        assert_eq!(synth.text, "hello");
        assert_eq!(synth.voice.as_deref(), Some("Puck"));
        assert_eq!(synth.speaking_rate, Some(0.8));
        assert_eq!(synth.emotion, Emotion::Urgent);
        assert_eq!(synth.prompt.as_deref(), Some("slow"));
    }

    #[test]
    fn test_speak_request_defaults() {
        let request: SpeakRequest = serde_json::from_str("{}").unwrap();
        let synth = SynthesizeRequest::from(request);
        assert_eq!(synth.text, "");
        assert_eq!(synth.emotion, Emotion::Neutral);
        assert!(synth.voice.is_none());
    }

    #[test]
    fn test_speak_response_is_camel_case() {
        let json = serde_json::to_value(SpeakResponse {
            audio_base64: "AAAA".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"audioBase64": "AAAA"}));
    }
}
