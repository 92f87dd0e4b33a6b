use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Error types for speech synthesis
#[derive(Debug, Error)]
pub enum TTSError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("tts failed status={status} body={body}")]
    Provider { status: u16, body: String },

    #[error("tts http error: {0}")]
    NetworkError(String),

    #[error("Invalid tts response: {0}")]
    InvalidResponse(String),

    #[error("Speech synthesis cancelled")]
    Cancelled,
}

pub type TTSResult<T> = Result<T, TTSError>;

/// Delivery tone requested by the caregiver UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emotion {
    #[default]
    Neutral,
    Calm,
    Friendly,
    Urgent,
}

impl Emotion {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Calm => "calm",
            Self::Friendly => "friendly",
            Self::Urgent => "urgent",
        }
    }

    /// Parse from string, with fallback to neutral.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "calm" => Self::Calm,
            "friendly" => Self::Friendly,
            "urgent" => Self::Urgent,
            _ => Self::Neutral,
        }
    }

    /// Style instruction prepended to the prompt, if any.
    pub fn style_instruction(&self) -> Option<&'static str> {
        match self {
            Self::Neutral => None,
            Self::Calm => Some("Speak in a calm, reassuring tone."),
            Self::Friendly => Some("Speak in a warm, friendly tone."),
            Self::Urgent => Some("Speak in a clear, urgent tone without sounding scary."),
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text to synthesize plus optional delivery hints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesizeRequest {
    pub text: String,
    /// Short (`Charon`) or fully qualified (`en-US-Chirp3-HD-Charon`) voice
    pub voice: Option<String>,
    pub speaking_rate: Option<f32>,
    pub emotion: Emotion,
    pub prompt: Option<String>,
}

impl SynthesizeRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Emotion instruction followed by the free-form prompt.
    pub fn style_prompt(&self) -> Option<String> {
        let instruction: Option<&str> = self.emotion.style_instruction();
        let parts: Vec<&str> = instruction
            .into_iter()
            .chain(self.prompt.as_deref().map(str::trim))
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Synthesized audio, base64 encoded MP3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizeResponse {
    pub audio_base64: String,
}

impl SynthesizeResponse {
    pub fn audio_bytes(&self) -> TTSResult<Vec<u8>> {
        STANDARD.decode(&self.audio_base64).map_err(|e| {
            TTSError::InvalidResponse(format!("audioContent is not valid base64: {e}"))
        })
    }
}

/// Turns text into speech audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        request: &SynthesizeRequest,
        cancel: Option<&CancellationToken>,
    ) -> TTSResult<SynthesizeResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_parsing() {
        assert_eq!(Emotion::from_str_or_default("calm"), Emotion::Calm);
        assert_eq!(Emotion::from_str_or_default("Friendly"), Emotion::Friendly);
        assert_eq!(Emotion::from_str_or_default(" URGENT "), Emotion::Urgent);
        assert_eq!(Emotion::from_str_or_default("sarcastic"), Emotion::Neutral);
        assert_eq!(Emotion::from_str_or_default(""), Emotion::Neutral);
    }

    #[test]
    fn test_style_prompt_combines_emotion_and_prompt() {
        let mut request = SynthesizeRequest::new("hello");
        assert_eq!(request.style_prompt(), None);

        request.prompt = Some("Slow down on drug names.".to_string());
        assert_eq!(
            request.style_prompt().as_deref(),
            Some("Slow down on drug names.")
        );

        request.emotion = Emotion::Calm;
        assert_eq!(
            request.style_prompt().as_deref(),
            Some("Speak in a calm, reassuring tone. Slow down on drug names.")
        );

        request.prompt = Some("   ".to_string());
        assert_eq!(
            request.style_prompt().as_deref(),
            Some("Speak in a calm, reassuring tone.")
        );
    }

    #[test]
    fn test_audio_bytes_decodes() {
        let response = SynthesizeResponse {
            audio_base64: "SUQzBAA=".to_string(),
        };
        assert_eq!(response.audio_bytes().unwrap(), b"ID3\x04\x00".to_vec());

        let bad = SynthesizeResponse {
            audio_base64: "not base64!".to_string(),
        };
        assert!(matches!(bad.audio_bytes(), Err(TTSError::InvalidResponse(_))));
    }
}
