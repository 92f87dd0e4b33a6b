use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::core::notifications::{NotificationResult, Notifier, TwilioSmsNotifier};
use crate::core::tts::{
    AdcTokenProvider, AudioArchive, GoogleTts, SpeechSynthesizer, StaticTokenProvider,
    SynthesizeResponse, TTSResult, TokenProvider,
};

/// Shared application state handed to every handler.
///
/// Clients are built once at startup. The speech client is optional: without
/// a Google Cloud project the speech routes answer 503.
pub struct AppState {
    pub config: ServerConfig,
    pub notifier: Arc<dyn Notifier>,
    pub tts: Option<Arc<dyn SpeechSynthesizer>>,
    pub audio_archive: Option<AudioArchive>,
    /// Root token; cancelled on shutdown so in-flight provider calls abort.
    pub shutdown: CancellationToken,
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("messaging client: {0}")]
    Notifier(#[from] crate::core::notifications::NotificationError),
    #[error("speech client: {0}")]
    Tts(#[from] crate::core::tts::TTSError),
}

impl AppState {
    /// Assemble state from already-built clients.
    pub fn new(
        config: ServerConfig,
        notifier: Arc<dyn Notifier>,
        tts: Option<Arc<dyn SpeechSynthesizer>>,
    ) -> Arc<Self> {
        let audio_archive = config.tts_output_dir.clone().map(AudioArchive::new);

        Arc::new(Self {
            config,
            notifier,
            tts,
            audio_archive,
            shutdown: CancellationToken::new(),
        })
    }

    /// Build the Twilio and Google clients described by `config`.
    ///
    /// Fails when a Twilio credential is missing or when Application Default
    /// Credentials cannot be resolved for a configured project.
    pub fn from_config(config: ServerConfig) -> Result<Arc<Self>, StateError> {
        let notifier = build_notifier(&config)?;
        let tts = build_tts(&config)?;

        match &tts {
            Some(_) => info!(
                "Speech synthesis enabled for project {}",
                config.google_cloud_project.as_deref().unwrap_or_default()
            ),
            None => info!("GOOGLE_CLOUD_PROJECT not set, speech synthesis disabled"),
        }

        Ok(Self::new(config, notifier, tts))
    }

    /// Token scoped to a single request; cancelled with the root token.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Write a clip to the audio archive when one is configured.
    ///
    /// Failures are logged and never reach the caller.
    pub async fn archive_audio(&self, response: &SynthesizeResponse) {
        let Some(archive) = &self.audio_archive else {
            return;
        };

        let bytes = match response.audio_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping audio archive, undecodable clip: {}", e);
                return;
            }
        };

        match archive.save_mp3(&bytes).await {
            Ok(path) => info!("Saved synthesized audio to {}", path.display()),
            Err(e) => warn!(
                "Failed to save synthesized audio to {}: {}",
                archive.dir().display(),
                e
            ),
        }
    }
}

fn build_notifier(config: &ServerConfig) -> NotificationResult<Arc<dyn Notifier>> {
    let notifier = TwilioSmsNotifier::new(config.twilio_config())?;
    Ok(Arc::new(notifier))
}

fn build_tts(config: &ServerConfig) -> TTSResult<Option<Arc<dyn SpeechSynthesizer>>> {
    let Some(tts_config) = config.google_tts_config() else {
        return Ok(None);
    };

    let token_provider: Arc<dyn TokenProvider> = match config.google_tts_access_token.as_deref() {
        Some(token) => {
            info!("Using GOOGLE_TTS_ACCESS_TOKEN for speech synthesis");
            Arc::new(StaticTokenProvider::new(token))
        }
        None => Arc::new(AdcTokenProvider::new()?),
    };

    let client = GoogleTts::new(tts_config, token_provider)?;
    Ok(Some(Arc::new(client)))
}
