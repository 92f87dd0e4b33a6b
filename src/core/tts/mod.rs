//! Speech synthesis.
//!
//! - `base` - Request/response types, errors and the `SpeechSynthesizer` trait
//! - `auth` - Bearer token sources for Google Cloud
//! - `google` - Google Cloud Text-to-Speech client (Chirp 3 HD voices)
//! - `archive` - Optional on-disk copy of synthesized clips

pub mod archive;
pub mod auth;
mod base;
pub mod google;

pub use archive::AudioArchive;
pub use auth::{AdcTokenProvider, GOOGLE_CLOUD_PLATFORM_SCOPE, StaticTokenProvider, TokenProvider};
pub use base::{
    Emotion, SpeechSynthesizer, SynthesizeRequest, SynthesizeResponse, TTSError, TTSResult,
};
pub use google::{
    DEFAULT_LANGUAGE_CODE, DEFAULT_SPEAKING_RATE, DEFAULT_VOICE, DEFAULT_VOICE_FAMILY,
    GOOGLE_TTS_URL, GoogleTts, GoogleTtsConfig, normalize_speaking_rate,
};
