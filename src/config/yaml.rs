use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::ServerConfig;

/// Complete YAML configuration structure
///
/// All fields are optional; anything set here overrides the value taken
/// from the environment.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8090
///
/// twilio:
///   account_sid: "ACxxxxxxxx"
///   auth_token: "your-auth-token"
///   messaging_service_sid: "MGxxxxxxxx"
///
/// google:
///   project_id: "dosedock-prod"
///   # access_token: "ya29...."   # skip ADC and use a fixed token
///
/// tts:
///   language_code: "en-US"
///   default_voice: "Charon"
///   voice_family: "Chirp3-HD"
///   output_dir: "tts_output"
///
/// security:
///   cors_allowed_origins: "*"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub twilio: Option<TwilioYaml>,
    pub google: Option<GoogleYaml>,
    pub tts: Option<TtsYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Twilio credentials from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TwilioYaml {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub messaging_service_sid: Option<String>,
    pub api_base_url: Option<String>,
}

/// Google Cloud settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GoogleYaml {
    pub project_id: Option<String>,
    pub access_token: Option<String>,
    pub tts_url: Option<String>,
}

/// Voice defaults from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TtsYaml {
    pub language_code: Option<String>,
    pub default_voice: Option<String>,
    pub voice_family: Option<String>,
    pub output_dir: Option<String>,
}

/// Security settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load YAML configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            format!("Failed to read config file {}: {}", path.display(), e)
        })?;
        Self::from_str(&contents)
    }

    /// Parse YAML configuration from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        serde_yaml::from_str(contents).map_err(|e| format!("Failed to parse YAML: {e}").into())
    }

    /// Overlay every value present in the YAML onto `config`.
    pub fn apply_to(self, config: &mut ServerConfig) {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }
        fn set_opt<T>(target: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *target = value;
            }
        }

        if let Some(server) = self.server {
            set(&mut config.host, server.host);
            set(&mut config.port, server.port);
        }

        if let Some(twilio) = self.twilio {
            set_opt(&mut config.twilio_account_sid, twilio.account_sid);
            set_opt(&mut config.twilio_auth_token, twilio.auth_token);
            set_opt(
                &mut config.twilio_messaging_service_sid,
                twilio.messaging_service_sid,
            );
            set(&mut config.twilio_api_base_url, twilio.api_base_url);
        }

        if let Some(google) = self.google {
            set_opt(&mut config.google_cloud_project, google.project_id);
            set_opt(&mut config.google_tts_access_token, google.access_token);
            set(&mut config.google_tts_url, google.tts_url);
        }

        if let Some(tts) = self.tts {
            set(&mut config.tts_language_code, tts.language_code);
            set(&mut config.tts_default_voice, tts.default_voice);
            set(&mut config.tts_voice_family, tts.voice_family);
            set_opt(&mut config.tts_output_dir, tts.output_dir.map(PathBuf::from));
        }

        if let Some(security) = self.security {
            set_opt(
                &mut config.cors_allowed_origins,
                security.cors_allowed_origins,
            );
            set(
                &mut config.rate_limit_requests_per_second,
                security.rate_limit_requests_per_second,
            );
            set(
                &mut config.rate_limit_burst_size,
                security.rate_limit_burst_size,
            );
        }
    }
}
