//! Server Startup Tests
//!
//! Configuration loading through to a working router, the way `main` wires it.

use std::env;
use std::fs;

use axum::{body::Body, http::Request, http::StatusCode};
use serial_test::serial;
use tempfile::TempDir;
use tower::util::ServiceExt;

use dosedock_relay::{ServerConfig, routes, state::AppState};

const VARS: &[&str] = &[
    "TWILIO_ACCOUNT_SID",
    "TWILIO_AUTH_TOKEN",
    "TWILIO_MESSAGING_SERVICE_SID",
    "GOOGLE_CLOUD_PROJECT",
    "GOOGLE_TTS_ACCESS_TOKEN",
    "PORT",
];

fn clear_env() {
    for key in VARS {
        unsafe {
            env::remove_var(key);
        }
    }
}

#[tokio::test]
#[serial]
async fn test_boot_from_yaml() {
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("relay.yaml");
    fs::write(
        &config_path,
        r#"
server:
  host: "127.0.0.1"
  port: 9999
twilio:
  account_sid: "AC123"
  auth_token: "secret"
  messaging_service_sid: "MG456"
google:
  project_id: "dosedock-test"
  access_token: "ya29.static"
"#,
    )
    .unwrap();

    let config = ServerConfig::from_file(&config_path).unwrap();
    assert_eq!(config.address(), "127.0.0.1:9999");

    let state = AppState::from_config(config).unwrap();
    assert!(state.tts.is_some());

    let app = routes::create_router().with_state(state);
    let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
#[serial]
fn test_boot_fails_without_twilio_credentials() {
    clear_env();
    unsafe {
        env::set_var("TWILIO_ACCOUNT_SID", "AC123");
        env::set_var("TWILIO_AUTH_TOKEN", "secret");
    }

    let config = ServerConfig::from_env().unwrap();
    let err = AppState::from_config(config).err().unwrap();
    assert!(err.to_string().contains("TWILIO_MESSAGING_SERVICE_SID not set"));

    clear_env();
}
