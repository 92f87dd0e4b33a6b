use axum::extract::{Form, rejection::FormRejection};
use serde::Deserialize;
use tracing::{info, warn};

use super::error::ApiResult;

/// Delivery status callback posted by Twilio (form encoded).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusCallback {
    pub message_sid: Option<String>,
    pub message_status: Option<String>,
    pub to: Option<String>,
    pub from: Option<String>,
    pub error_code: Option<String>,
}

/// Log a delivery status update.
pub async fn status_callback(
    payload: Result<Form<StatusCallback>, FormRejection>,
) -> ApiResult<&'static str> {
    let Form(status) = payload?;

    let sid = status.message_sid.as_deref().unwrap_or_default();
    let state = status.message_status.as_deref().unwrap_or_default();
    let to = status.to.as_deref().unwrap_or_default();
    let from = status.from.as_deref().unwrap_or_default();

    match status.error_code.as_deref().filter(|c| !c.is_empty()) {
        Some(code) => warn!(
            "Twilio status callback: sid={} status={} to={} from={} error_code={}",
            sid, state, to, from, code
        ),
        None => info!(
            "Twilio status callback: sid={} status={} to={} from={}",
            sid, state, to, from
        ),
    }

    Ok("ok")
}
