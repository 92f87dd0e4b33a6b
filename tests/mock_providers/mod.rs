//! Simulated Twilio and Google Cloud Text-to-Speech backends
//!
//! Each helper starts a `wiremock` server and mounts the responses the relay
//! expects from the real provider. Configs returned here point at those servers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dosedock_relay::{ServerConfig, routes, state::AppState};

pub const ACCOUNT_SID: &str = "AC123";
pub const MESSAGES_PATH: &str = "/2010-04-01/Accounts/AC123/Messages.json";
pub const TTS_PATH: &str = "/v1/text:synthesize";
pub const PROJECT_ID: &str = "dosedock-test";
pub const ACCESS_TOKEN: &str = "ya29.test-token";
/// "ID3" header bytes, enough to look like an MP3 to the archive.
pub const AUDIO_BASE64: &str = "SUQzAwAAAAA=";

/// Configuration with Twilio pointed at `twilio` and speech disabled.
pub fn create_test_config(twilio: &MockServer) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 8090,
        twilio_account_sid: Some(ACCOUNT_SID.to_string()),
        twilio_auth_token: Some("secret".to_string()),
        twilio_messaging_service_sid: Some("MG456".to_string()),
        twilio_api_base_url: twilio.uri(),
        google_cloud_project: None,
        google_tts_access_token: None,
        google_tts_url: "https://texttospeech.googleapis.com/v1/text:synthesize".to_string(),
        tts_language_code: "en-US".to_string(),
        tts_default_voice: "Charon".to_string(),
        tts_voice_family: "Chirp3-HD".to_string(),
        tts_output_dir: None,
        cors_allowed_origins: None,
        rate_limit_requests_per_second: 60,
        rate_limit_burst_size: 10,
    }
}

/// Enable speech synthesis against `google` with a static token.
pub fn with_tts(mut config: ServerConfig, google: &MockServer) -> ServerConfig {
    config.google_cloud_project = Some(PROJECT_ID.to_string());
    config.google_tts_access_token = Some(ACCESS_TOKEN.to_string());
    config.google_tts_url = format!("{}{}", google.uri(), TTS_PATH);
    config
}

pub fn build_app(config: ServerConfig) -> (Router, Arc<AppState>) {
    let state = AppState::from_config(config).expect("state should build");
    let app = routes::create_router().with_state(state.clone());
    (app, state)
}

pub async fn mount_twilio_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sid": "SM0001",
            "status": "accepted"
        })))
        .mount(server)
        .await;
}

pub async fn mount_twilio_failure(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_tts_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TTS_PATH))
        .and(header("x-goog-user-project", PROJECT_ID))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "audioContent": AUDIO_BASE64
        })))
        .mount(server)
        .await;
}

pub async fn mount_tts_failure(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(TTS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send a request and decode the JSON reply.
pub async fn call_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

/// Decoded form fields of the `index`th request received by `server`.
pub async fn received_form(server: &MockServer, index: usize) -> Vec<(String, String)> {
    let requests = server.received_requests().await.unwrap_or_default();
    let request = &requests[index];
    url::form_urlencoded::parse(&request.body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// JSON body of the `index`th request received by `server`.
pub async fn received_json(server: &MockServer, index: usize) -> Value {
    let requests = server.received_requests().await.unwrap_or_default();
    serde_json::from_slice(&requests[index].body).unwrap()
}

/// The app as `main` serves it: routes plus CORS, rate limiting and security headers.
pub fn build_served_app(config: ServerConfig) -> Router {
    let state = AppState::from_config(config).expect("state should build");
    routes::build_app(state).expect("app should build")
}

/// GET `uri` as a client behind a proxy reporting `client_ip`.
pub fn get_from(uri: &str, client_ip: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-forwarded-for", client_ip)
        .body(Body::empty())
        .unwrap()
}
