//! Bearer credentials for Google Cloud APIs.
//!
//! Two sources are supported:
//! - [`AdcTokenProvider`] resolves Application Default Credentials through
//!   `google-cloud-auth` (service account file, gcloud user credentials or
//!   the metadata server, whichever the host provides)
//! - [`StaticTokenProvider`] hands out a pre-minted OAuth2 access token
//!   (`GOOGLE_TTS_ACCESS_TOKEN`)

use async_trait::async_trait;
use google_cloud_auth::credentials::{Builder, CacheableResource, Credentials};
use http::{Extensions, HeaderMap, header::AUTHORIZATION};
use tracing::debug;
use zeroize::Zeroizing;

use super::base::{TTSError, TTSResult};

/// OAuth2 scope covering Cloud Text-to-Speech
pub const GOOGLE_CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Source of OAuth2 bearer tokens.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a non-empty access token, without the `Bearer ` prefix.
    async fn access_token(&self) -> TTSResult<String>;
}

/// Fixed access token supplied through configuration.
pub struct StaticTokenProvider {
    token: Zeroizing<String>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Zeroizing::new(token.into()),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> TTSResult<String> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(TTSError::Authentication(
                "configured access token is empty".to_string(),
            ));
        }
        Ok(token.to_string())
    }
}

/// Application Default Credentials.
pub struct AdcTokenProvider {
    credentials: Credentials,
}

impl AdcTokenProvider {
    pub fn new() -> TTSResult<Self> {
        let credentials = Builder::default()
            .with_scopes([GOOGLE_CLOUD_PLATFORM_SCOPE])
            .build()
            .map_err(|e| {
                TTSError::Authentication(format!(
                    "failed to load Application Default Credentials: {e}"
                ))
            })?;
        Ok(Self { credentials })
    }
}

#[async_trait]
impl TokenProvider for AdcTokenProvider {
    async fn access_token(&self) -> TTSResult<String> {
        let resource = self
            .credentials
            .headers(Extensions::new())
            .await
            .map_err(|e| TTSError::Authentication(format!("failed to get access token: {e}")))?;

        match resource {
            CacheableResource::New { data, .. } => {
                debug!("Resolved Google access token from ADC");
                bearer_from_headers(&data)
            }
            CacheableResource::NotModified => Err(TTSError::Authentication(
                "credentials returned no headers".to_string(),
            )),
        }
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_from_headers(headers: &HeaderMap) -> TTSResult<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            TTSError::Authentication(
                "failed to get access token from Application Default Credentials".to_string(),
            )
        })
}
