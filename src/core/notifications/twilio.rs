//! Twilio SMS delivery.
//!
//! # API Reference
//!
//! - Endpoint: `POST {base}/2010-04-01/Accounts/{AccountSid}/Messages.json`
//! - Body: form-encoded `To`, `MessagingServiceSid`, `Body`
//! - Auth: HTTP basic with `AccountSid:AuthToken`
//!
//! Any non-2xx response is surfaced as [`NotificationError::Provider`] with
//! the status and raw body. Nothing is retried.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::types::{Channel, NotificationError, NotificationRequest, NotificationResult, Notifier};
use crate::utils::with_cancellation;

/// Default Twilio REST API base URL
pub const TWILIO_API_BASE_URL: &str = "https://api.twilio.com";

/// Credentials and endpoint for the Twilio Messages API.
#[derive(Clone, Default)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub messaging_service_sid: String,
    /// Base URL, overridable for tests and regional edges
    pub api_base_url: String,
}

impl fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("messaging_service_sid", &self.messaging_service_sid)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl TwilioConfig {
    pub fn messages_url(&self) -> String {
        let base = if self.api_base_url.trim().is_empty() {
            TWILIO_API_BASE_URL
        } else {
            self.api_base_url.trim().trim_end_matches('/')
        };
        format!(
            "{base}/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }
}

/// Subset of the Twilio message resource we log.
#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: Option<String>,
    status: Option<String>,
}

/// [`Notifier`] backed by Twilio Programmable Messaging.
pub struct TwilioSmsNotifier {
    config: TwilioConfig,
    client: Client,
}

impl TwilioSmsNotifier {
    /// Build a notifier, failing on the first missing credential.
    pub fn new(config: TwilioConfig) -> NotificationResult<Self> {
        if config.account_sid.trim().is_empty() {
            return Err(NotificationError::MissingCredential("TWILIO_ACCOUNT_SID"));
        }
        if config.auth_token.trim().is_empty() {
            return Err(NotificationError::MissingCredential("TWILIO_AUTH_TOKEN"));
        }
        if config.messaging_service_sid.trim().is_empty() {
            return Err(NotificationError::MissingCredential(
                "TWILIO_MESSAGING_SERVICE_SID",
            ));
        }

        let client = Client::builder().build().map_err(|e| {
            NotificationError::InvalidConfiguration(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &TwilioConfig {
        &self.config
    }

    fn validate(request: &NotificationRequest) -> NotificationResult<()> {
        match request.channel {
            Channel::Sms => {}
        }
        if request.to.trim().is_empty() {
            return Err(NotificationError::InvalidRequest("missing 'to'".to_string()));
        }
        if request.body.trim().is_empty() {
            return Err(NotificationError::InvalidRequest(
                "missing 'body'".to_string(),
            ));
        }
        Ok(())
    }

    async fn post_message(&self, request: &NotificationRequest) -> NotificationResult<()> {
        let form = [
            ("To", request.to.as_str()),
            ("MessagingServiceSid", self.config.messaging_service_sid.as_str()),
            ("Body", request.body.as_str()),
        ];

        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!(to = %request.to, error = %e, "Twilio request failed");
                NotificationError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            error!(
                to = %request.to,
                status = status.as_u16(),
                body = %body,
                "Twilio send failed"
            );
            return Err(NotificationError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<TwilioMessageResponse>(&body) {
            Ok(message) => info!(
                to = %request.to,
                len = request.body.len(),
                sid = message.sid.as_deref().unwrap_or(""),
                status = message.status.as_deref().unwrap_or(""),
                "Twilio SMS sent"
            ),
            Err(e) => {
                debug!(error = %e, "Twilio response was not a message resource");
                info!(to = %request.to, len = request.body.len(), "Twilio SMS sent");
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for TwilioSmsNotifier {
    async fn send(
        &self,
        request: &NotificationRequest,
        cancel: Option<&CancellationToken>,
    ) -> NotificationResult<()> {
        Self::validate(request)?;

        with_cancellation(cancel, self.post_message(request))
            .await
            .unwrap_or(Err(NotificationError::Cancelled))
    }
}
