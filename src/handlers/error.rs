//! Failure responses shared by every handler.
//!
//! Every failure is returned as `{"ok": false, "error": "<message>"}` with a
//! status code chosen from the error kind.

use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::core::notifications::{NotificationError, RenderError};
use crate::core::tts::TTSError;

/// A handler failure carrying the HTTP status and the message sent to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({"ok": false, "error": self.message})),
        )
            .into_response()
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        let message = err.to_string();
        match err {
            NotificationError::InvalidRequest(_) => Self::bad_request(message),
            NotificationError::Provider { .. } | NotificationError::Network(_) => {
                error!("SMS delivery failed: {}", message);
                Self::bad_gateway(message)
            }
            NotificationError::Cancelled => Self::service_unavailable(message),
            NotificationError::MissingCredential(_)
            | NotificationError::InvalidConfiguration(_) => Self::internal(message),
        }
    }
}

impl From<TTSError> for ApiError {
    fn from(err: TTSError) -> Self {
        let message = err.to_string();
        match err {
            TTSError::InvalidRequest(_) => Self::bad_request(message),
            TTSError::Provider { .. }
            | TTSError::NetworkError(_)
            | TTSError::InvalidResponse(_)
            | TTSError::Authentication(_) => {
                error!("Speech synthesis failed: {}", message);
                Self::bad_gateway(message)
            }
            TTSError::Cancelled => Self::service_unavailable(message),
            TTSError::InvalidConfiguration(_) => Self::internal(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("invalid json: {}", rejection.body_text()))
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::bad_request(format!("invalid form: {}", rejection.body_text()))
    }
}
