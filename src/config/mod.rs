//! Configuration module for the DoseDock relay
//!
//! Configuration is read once at startup from `.env`, environment variables
//! and an optional YAML file. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `env`: Environment variable loading
//! - `yaml`: YAML configuration file loading
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use dosedock_relay::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable defaults
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

use crate::core::notifications::TwilioConfig;
use crate::core::tts::GoogleTtsConfig;

/// Server configuration
///
/// Secrets are zeroized when the configuration is dropped, so build test
/// values by mutating an existing config instead of struct-update syntax.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    // Twilio
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_messaging_service_sid: Option<String>,
    pub twilio_api_base_url: String,

    // Google Cloud Text-to-Speech
    pub google_cloud_project: Option<String>,
    /// Fixed bearer token; Application Default Credentials are used when unset
    pub google_tts_access_token: Option<String>,
    pub google_tts_url: String,

    // Voice defaults
    pub tts_language_code: String,
    pub tts_default_voice: String,
    pub tts_voice_family: String,
    /// Directory receiving a copy of every synthesized clip
    pub tts_output_dir: Option<PathBuf>,

    // Security
    /// Comma separated origins, or `*`; CORS is disabled when unset
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: u32,
    pub rate_limit_burst_size: u32,
}

/// Implement Drop to zeroize all secret fields when ServerConfig is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut token) = self.twilio_auth_token {
            token.zeroize();
        }
        if let Some(ref mut token) = self.google_tts_access_token {
            token.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = env::load_from_env()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file, using environment variables as the base
    ///
    /// Values present in the YAML file override the environment.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = YamlConfig::from_file(path)?;

        let mut config = env::load_from_env()?;
        yaml_config.apply_to(&mut config);

        validation::validate(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Twilio client settings; missing credentials become empty strings and
    /// are rejected when the notifier is built.
    pub fn twilio_config(&self) -> TwilioConfig {
        TwilioConfig {
            account_sid: self.twilio_account_sid.clone().unwrap_or_default(),
            auth_token: self.twilio_auth_token.clone().unwrap_or_default(),
            messaging_service_sid: self.twilio_messaging_service_sid.clone().unwrap_or_default(),
            api_base_url: self.twilio_api_base_url.clone(),
        }
    }

    /// Speech client settings, or `None` when no Google Cloud project is set.
    pub fn google_tts_config(&self) -> Option<GoogleTtsConfig> {
        let project_id = self
            .google_cloud_project
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())?;

        Some(GoogleTtsConfig {
            project_id: project_id.to_string(),
            api_url: self.google_tts_url.clone(),
            language_code: self.tts_language_code.clone(),
            default_voice: self.tts_default_voice.clone(),
            voice_family: self.tts_voice_family.clone(),
        })
    }

    /// Allowed CORS origins; `None` disables the CORS layer.
    pub fn cors_origins(&self) -> Option<Vec<String>> {
        let raw = self.cors_allowed_origins.as_deref()?;
        let origins: Vec<String> = raw
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if origins.is_empty() {
            None
        } else {
            Some(origins)
        }
    }

    /// Rates at or above this are treated as "no limit" and skip the governor layer.
    pub fn rate_limiting_enabled(&self) -> bool {
        self.rate_limit_requests_per_second < crate::middleware::RATE_LIMIT_DISABLED_AT
    }
}
