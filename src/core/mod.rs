pub mod notifications;
pub mod tts;

pub use notifications::{
    Channel, EventKind, EventPayload, NotificationError, NotificationRequest, NotificationResult,
    Notifier, RenderError, TwilioConfig, TwilioSmsNotifier, render_body,
};
pub use tts::{
    AudioArchive, Emotion, GoogleTts, GoogleTtsConfig, SpeechSynthesizer, SynthesizeRequest,
    SynthesizeResponse, TTSError, TTSResult,
};
