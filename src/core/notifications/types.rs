use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Delivery medium for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Channel {
    #[default]
    #[serde(rename = "SMS")]
    Sms,
}

impl Channel {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => "SMS",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Recipient address (E.164 phone number for SMS)
    pub to: String,
    /// Plain text body
    pub body: String,
    pub channel: Channel,
}

impl NotificationRequest {
    pub fn sms(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            body: body.into(),
            channel: Channel::Sms,
        }
    }
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("{0} not set")]
    MissingCredential(&'static str),

    #[error("invalid messaging configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("twilio send failed: status={status} body={body}")]
    Provider { status: u16, body: String },

    #[error("twilio http error: {0}")]
    Network(String),

    #[error("notification cancelled")]
    Cancelled,
}

pub type NotificationResult<T> = Result<T, NotificationError>;

/// Sends notifications through some provider.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `request`, aborting early when `cancel` fires.
    async fn send(
        &self,
        request: &NotificationRequest,
        cancel: Option<&CancellationToken>,
    ) -> NotificationResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_wire_format() {
        assert_eq!(serde_json::to_string(&Channel::Sms).unwrap(), "\"SMS\"");
        let parsed: Channel = serde_json::from_str("\"SMS\"").unwrap();
        assert_eq!(parsed, Channel::Sms);
        assert!(serde_json::from_str::<Channel>("\"TTS\"").is_err());
    }

    #[test]
    fn test_sms_request_builder() {
        let request = NotificationRequest::sms("+15551234567", "hello");
        assert_eq!(request.channel, Channel::Sms);
        assert_eq!(request.to, "+15551234567");
        assert_eq!(request.body, "hello");
    }

    #[test]
    fn test_provider_error_carries_status_and_body() {
        let err = NotificationError::Provider {
            status: 400,
            body: "{\"code\":21211}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("status=400"));
        assert!(msg.contains("21211"));
    }
}
