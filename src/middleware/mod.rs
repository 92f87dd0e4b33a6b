//! HTTP middleware applied around every route
//!
//! - CORS from `CORS_ALLOWED_ORIGINS`
//! - Per-IP rate limiting with JSON 429 bodies
//! - Security headers (`X-Content-Type-Options`, `X-Frame-Options`)

use std::time::Duration;

use axum::{
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::handlers::ApiError;

/// Rates at or above this many requests per second skip the governor layer.
pub const RATE_LIMIT_DISABLED_AT: u32 = 100_000;

/// Time to replenish one request slot at `requests_per_second`.
///
/// The governor is configured by replenish period, not by rate.
pub fn rate_limit_period(requests_per_second: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(requests_per_second.max(1)))
}

/// Build the CORS layer; `None` keeps browsers on same-origin.
pub fn cors_layer(origins: Option<Vec<String>>) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    match origins {
        Some(origins) if origins.iter().any(|o| o == "*") => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers([CONTENT_TYPE])
            .allow_credentials(false),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin '{}'", origin);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(methods)
                .allow_headers([CONTENT_TYPE])
                .allow_credentials(false)
        }
        None => {
            info!(
                "CORS not configured, defaulting to same-origin only. \
                 Set CORS_ALLOWED_ORIGINS to enable cross-origin access."
            );
            CorsLayer::new()
                .allow_methods(methods)
                .allow_headers([CONTENT_TYPE])
        }
    }
}

/// Replace the governor's plain-text 429 with the relay's JSON failure body.
///
/// Rate limit headers set by the governor are kept.
pub async fn rate_limit_json(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let (parts, _) = response.into_parts();
    let mut json = ApiError::new(StatusCode::TOO_MANY_REQUESTS, "too many requests").into_response();
    for (name, value) in parts.headers.iter() {
        if name != CONTENT_TYPE && name != axum::http::header::CONTENT_LENGTH {
            json.headers_mut().insert(name.clone(), value.clone());
        }
    }
    json
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};

    #[test]
    fn test_rate_limit_period_is_inverse_of_rate() {
        assert_eq!(rate_limit_period(1), Duration::from_secs(1));
        assert_eq!(rate_limit_period(60), Duration::from_nanos(16_666_666));
        assert_eq!(rate_limit_period(1_000), Duration::from_millis(1));
    }

    #[test]
    fn test_rate_limit_period_never_zero_rate() {
        assert_eq!(rate_limit_period(0), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_rate_limit_json_rewrites_429() {
        let plain = http::Response::builder()
            .status(StatusCode::TOO_MANY_REQUESTS)
            .header("x-ratelimit-after", "1")
            .header(CONTENT_TYPE, "text/plain")
            .body(Body::from("Too Many Requests! Wait for 1s"))
            .unwrap();

        let response = rate_limit_json(plain).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["x-ratelimit-after"], "1");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"ok": false, "error": "too many requests"}));
    }

    #[tokio::test]
    async fn test_rate_limit_json_passes_other_responses() {
        let ok = http::Response::builder()
            .status(StatusCode::OK)
            .body(Body::from("ok"))
            .unwrap();
        let response = rate_limit_json(ok).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }
}
