pub mod api;
pub mod webhooks;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::handlers::api::health_check;
use crate::middleware::{self, RATE_LIMIT_DISABLED_AT};
use crate::state::AppState;

/// Every route the relay serves: public health check, webhooks and the API.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(health_check))
        .merge(webhooks::create_webhook_router())
        .merge(api::create_api_router())
}

/// The served application: all routes plus CORS, rate limiting and security headers.
///
/// Rate limiting keys on the client IP, so serve with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn build_app(state: Arc<AppState>) -> Result<Router, Box<dyn std::error::Error>> {
    let config = &state.config;

    // Configure rate limiting (disabled when rate >= 100000 for performance testing)
    let governor_layer = if config.rate_limiting_enabled() {
        let governor_config = GovernorConfigBuilder::default()
            .period(middleware::rate_limit_period(
                config.rate_limit_requests_per_second,
            ))
            .burst_size(config.rate_limit_burst_size)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or("Failed to build rate limiter config")?;
        info!(
            "Rate limiting {} requests/s per IP (burst {})",
            config.rate_limit_requests_per_second, config.rate_limit_burst_size
        );
        Some(GovernorLayer::new(governor_config))
    } else {
        info!("Rate limiting disabled (rate >= {}/s)", RATE_LIMIT_DISABLED_AT);
        None
    };

    let cors_layer = middleware::cors_layer(config.cors_origins());

    // Security headers
    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ));

    Ok(create_router()
        .with_state(state)
        .layer(cors_layer)
        .layer(tower::util::option_layer(governor_layer))
        .layer(axum::middleware::map_response(middleware::rate_limit_json))
        .layer(security_headers))
}
