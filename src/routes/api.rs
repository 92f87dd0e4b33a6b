use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::{events, sms, speak};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/send-sms", post(sms::send_sms))
        .route("/send-event", post(events::send_event))
        .route("/tts/speak", post(speak::speak_handler))
        .layer(TraceLayer::new_for_http())
}
