use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::twilio;
use crate::state::AppState;
use std::sync::Arc;

/// Provider callbacks
pub fn create_webhook_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/twilio/status", post(twilio::status_callback))
        .layer(TraceLayer::new_for_http())
}
