//! Reminder events
//!
//! # API Reference
//!
//! `POST /send-event`
//!
//! ```json
//! {
//!   "event": "DOSE_DUE",
//!   "to": "+15551234567",
//!   "payload": { "patientName": "Ada", "meds": "Metformin 500mg", "time": "8:00 AM" },
//!   "voice": "Charon",
//!   "emotion": "calm",
//!   "speakingRate": 0.9,
//!   "prompt": "Pronounce drug names slowly."
//! }
//! ```
//!
//! The event is rendered to text and sent as an SMS. When speech synthesis is
//! configured the same text is then spoken and the clip is returned:
//!
//! ```json
//! { "ok": true, "text": "Hi Ada, ...", "audioBase64": "..." }
//! ```
//!
//! A speech failure after the SMS went out answers
//! `{"ok": false, "text": "...", "error": "..."}` with the speech error's status.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::{ApiError, ApiResult};
use super::speak;
use crate::core::notifications::{
    EventKind, EventPayload, NotificationRequest, RenderError, render_body,
};
use crate::core::tts::{Emotion, SynthesizeRequest};
use crate::state::AppState;

/// Prompt used when an event carries none.
pub const DEFAULT_EVENT_PROMPT: &str = "Speak clearly and calmly for an older adult.";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEventRequest {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub to: String,
    /// `null` and an absent object both mean "no fields".
    #[serde(default)]
    pub payload: Option<HashMap<String, String>>,
    pub voice: Option<String>,
    pub emotion: Option<String>,
    pub speaking_rate: Option<f32>,
    pub prompt: Option<String>,
}

impl SendEventRequest {
    /// Resolve the event kind; the recipient is checked first.
    fn into_event(self) -> Result<EventPayload, RenderError> {
        if self.to.trim().is_empty() {
            return Err(RenderError::MissingRecipient);
        }
        let event: EventKind = self.event.parse()?;

        Ok(EventPayload {
            event,
            to: self.to,
            payload: self.payload.unwrap_or_default(),
            voice: self.voice,
            emotion: self.emotion,
            speaking_rate: self.speaking_rate,
            prompt: self.prompt,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendEventResponse {
    pub ok: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Speech request for an already rendered event.
pub fn speech_request(event: &EventPayload, text: &str) -> SynthesizeRequest {
    let prompt = event
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_EVENT_PROMPT);

    SynthesizeRequest {
        text: text.to_string(),
        voice: event.voice.clone(),
        speaking_rate: event.speaking_rate,
        emotion: event
            .emotion
            .as_deref()
            .map(Emotion::from_str_or_default)
            .unwrap_or_default(),
        prompt: Some(prompt.to_string()),
    }
}

/// Render an event, send it as SMS and speak it when speech is configured.
pub async fn send_event(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendEventRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SendEventResponse>)> {
    let Json(request) = payload?;
    let event = request.into_event()?;

    debug!(
        "send_event event={} voice={:?} emotion={:?} rate={:?} prompt={:?}",
        event.event, event.voice, event.emotion, event.speaking_rate, event.prompt
    );

    let text = render_body(&event)?;

    let notification = NotificationRequest::sms(event.to.clone(), text.clone());
    let cancel = state.request_token();
    state.notifier.send(&notification, Some(&cancel)).await?;
    info!("Event {} sent to {}", event.event, event.to);

    let mut response = SendEventResponse {
        ok: true,
        text,
        audio_base64: None,
        error: None,
    };

    if state.tts.is_none() {
        debug!("Speech synthesis not configured, skipping voice for {}", event.event);
        return Ok((StatusCode::OK, Json(response)));
    }

    let speech = speech_request(&event, &response.text);
    match speak::synthesize(&state, &speech).await {
        Ok(clip) => {
            response.audio_base64 = Some(clip.audio_base64);
            Ok((StatusCode::OK, Json(response)))
        }
        Err(ApiError { status, message }) => {
            warn!("SMS sent but speech failed for {}: {}", event.event, message);
            response.ok = false;
            response.error = Some(message);
            Ok((status, Json(response)))
        }
    }
}
