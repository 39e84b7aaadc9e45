#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use dingtalk_sdk::auth::{AccessTokenCache, AppCredentials, Clock};
use dingtalk_sdk::client::{Backoff, ClientConfig, HttpClient, RetryConfig};
use dingtalk_sdk::DingTalkClient;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const APP_KEY: &str = "ding-int-key";
pub const APP_SECRET: &str = "ding-int-secret";

/// Install a test-friendly subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn credentials() -> AppCredentials {
    AppCredentials::new("100", APP_KEY, APP_SECRET)
}

/// Both base URLs point at `server`; backoff is shrunk to milliseconds.
pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .with_base_url(server.uri())
        .with_retry(
            RetryConfig::default().with_backoff(
                Backoff::default()
                    .with_base_delay(Duration::from_millis(1))
                    .with_max_delay(Duration::from_millis(5)),
            ),
        )
        .build()
}

pub fn client_for(server: &MockServer) -> DingTalkClient {
    init_tracing();
    DingTalkClient::with_config(credentials(), config_for(server)).unwrap()
}

/// A client whose token cache reads time from `clock`.
pub fn client_with_clock(server: &MockServer, clock: Arc<dyn Clock>) -> DingTalkClient {
    init_tracing();
    let http = HttpClient::new(config_for(server)).unwrap();
    let tokens = Arc::new(AccessTokenCache::with_clock(http, credentials(), clock));
    DingTalkClient::from_token_cache(tokens)
}

pub fn token_response(token: &str, expires_in: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "errcode": 0,
        "errmsg": "ok",
        "access_token": token,
        "expires_in": expires_in
    }))
}

pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/gettoken"))
        .respond_with(token_response(token, 7200))
        .mount(server)
        .await;
}

/// A successful enveloped response carrying `fields`.
pub fn envelope(fields: serde_json::Value) -> ResponseTemplate {
    let mut body = serde_json::json!({"errcode": 0, "errmsg": "ok", "request_id": "int-req"});
    if let (Some(body), Some(fields)) = (body.as_object_mut(), fields.as_object()) {
        body.extend(fields.clone());
    }
    ResponseTemplate::new(200).set_body_json(body)
}
