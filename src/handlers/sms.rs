use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::error::ApiResult;
use crate::core::notifications::NotificationRequest;
use crate::state::AppState;

/// Body of `POST /send-sms`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendSmsRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendSmsResponse {
    pub ok: bool,
}

/// Relay a ready-made message as an SMS.
pub async fn send_sms(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendSmsRequest>, JsonRejection>,
) -> ApiResult<Json<SendSmsResponse>> {
    let Json(request) = payload?;

    let notification = NotificationRequest::sms(request.to, request.body);
    let cancel = state.request_token();
    state.notifier.send(&notification, Some(&cancel)).await?;

    info!("SMS relayed to {}", notification.to);
    Ok(Json(SendSmsResponse { ok: true }))
}
