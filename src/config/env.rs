use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use super::ServerConfig;
use crate::core::notifications::TWILIO_API_BASE_URL;
use crate::core::tts::{DEFAULT_LANGUAGE_CODE, DEFAULT_VOICE, DEFAULT_VOICE_FAMILY, GOOGLE_TTS_URL};

pub(super) const DEFAULT_HOST: &str = "0.0.0.0";
pub(super) const DEFAULT_PORT: u16 = 8090;
pub(super) const DEFAULT_RATE_LIMIT_RPS: u32 = 60;
pub(super) const DEFAULT_RATE_LIMIT_BURST: u32 = 10;

/// Read a variable, treating blank values as unset.
fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: Display,
{
    match env_string(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid {key} value '{raw}': {e}")),
        None => Ok(None),
    }
}

/// Build a configuration from environment variables and defaults.
pub(super) fn load_from_env() -> Result<ServerConfig, Box<dyn std::error::Error>> {
    Ok(ServerConfig {
        host: env_string("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: env_parse("PORT")?.unwrap_or(DEFAULT_PORT),

        twilio_account_sid: env_string("TWILIO_ACCOUNT_SID"),
        twilio_auth_token: env_string("TWILIO_AUTH_TOKEN"),
        twilio_messaging_service_sid: env_string("TWILIO_MESSAGING_SERVICE_SID"),
        twilio_api_base_url: env_string("TWILIO_API_BASE_URL")
            .unwrap_or_else(|| TWILIO_API_BASE_URL.to_string()),

        google_cloud_project: env_string("GOOGLE_CLOUD_PROJECT"),
        google_tts_access_token: env_string("GOOGLE_TTS_ACCESS_TOKEN"),
        google_tts_url: env_string("GOOGLE_TTS_URL").unwrap_or_else(|| GOOGLE_TTS_URL.to_string()),

        tts_language_code: env_string("TTS_LANGUAGE_CODE")
            .unwrap_or_else(|| DEFAULT_LANGUAGE_CODE.to_string()),
        tts_default_voice: env_string("TTS_DEFAULT_VOICE")
            .unwrap_or_else(|| DEFAULT_VOICE.to_string()),
        tts_voice_family: env_string("TTS_VOICE_FAMILY")
            .unwrap_or_else(|| DEFAULT_VOICE_FAMILY.to_string()),
        tts_output_dir: env_string("TTS_OUTPUT_DIR").map(PathBuf::from),

        cors_allowed_origins: env_string("CORS_ALLOWED_ORIGINS"),
        rate_limit_requests_per_second: env_parse("RATE_LIMIT_REQUESTS_PER_SECOND")?
            .unwrap_or(DEFAULT_RATE_LIMIT_RPS),
        rate_limit_burst_size: env_parse("RATE_LIMIT_BURST_SIZE")?
            .unwrap_or(DEFAULT_RATE_LIMIT_BURST),
    })
}
