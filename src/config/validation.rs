use super::ServerConfig;

/// Check values that would otherwise only fail on the first request.
pub(super) fn validate(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    validate_url("TWILIO_API_BASE_URL", &config.twilio_api_base_url)?;
    validate_url("GOOGLE_TTS_URL", &config.google_tts_url)?;

    if config.rate_limit_requests_per_second == 0 {
        return Err("RATE_LIMIT_REQUESTS_PER_SECOND must be greater than 0".into());
    }
    if config.rate_limit_burst_size == 0 {
        return Err("RATE_LIMIT_BURST_SIZE must be greater than 0".into());
    }
    if config.tts_language_code.trim().is_empty() {
        return Err("TTS_LANGUAGE_CODE must not be empty".into());
    }

    Ok(())
}

fn validate_url(name: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = url::Url::parse(value).map_err(|e| format!("Invalid {name} '{value}': {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("Invalid {name} '{value}': unsupported scheme '{other}'").into()),
    }
}
