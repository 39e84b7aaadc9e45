use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use chrono::Duration;
use dingtalk_sdk::auth::ManualClock;
use tokio::task::JoinSet;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{self, envelope, token_response};

async fn mount_counted_token(server: &MockServer, expires_in: i64) -> Arc<AtomicU32> {
    let fetches = Arc::new(AtomicU32::new(0));
    let counter = fetches.clone();
    Mock::given(method("GET"))
        .and(path("/gettoken"))
        .and(query_param("appkey", common::APP_KEY))
        .and(query_param("appsecret", common::APP_SECRET))
        .respond_with(move |_: &wiremock::Request| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            token_response(&format!("token-{n}"), expires_in).set_delay(std::time::Duration::from_millis(50))
        })
        .mount(server)
        .await;
    fetches
}

async fn mount_child_ids(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/topapi/v2/department/listsubid"))
        .respond_with(envelope(serde_json::json!({"result": {"dept_id_list": []}})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_api_calls_share_cached_token() {
    let server = MockServer::start().await;
    let fetches = mount_counted_token(&server, 7200).await;
    mount_child_ids(&server).await;

    let client = common::client_for(&server);
    for dept_id in 1..=5 {
        client.child_department_ids(dept_id).await.unwrap();
    }

    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    let requests = server.received_requests().await.unwrap();
    let tokens: Vec<String> = requests
        .iter()
        .filter(|r| r.url.path() == "/topapi/v2/department/listsubid")
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "access_token")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(tokens, vec!["token-1"; 5]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_after_expiry_refresh_once() {
    let server = MockServer::start().await;
    let fetches = mount_counted_token(&server, 7200).await;
    mount_child_ids(&server).await;

    let clock = Arc::new(ManualClock::default());
    let client = common::client_with_clock(&server, clock.clone());

    assert_eq!(client.access_token().await.unwrap().as_str(), "token-1");
    clock.advance(Duration::seconds(7200));

    let mut tasks = JoinSet::new();
    for dept_id in 0..20u64 {
        let client = client.clone();
        tasks.spawn(async move {
            client.child_department_ids(dept_id).await.unwrap();
            client.access_token().await.unwrap()
        });
    }

    while let Some(token) = tasks.join_next().await {
        assert_eq!(token.unwrap().as_str(), "token-2");
    }
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_rejected_token_surfaces_and_recovers() {
    let server = MockServer::start().await;
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = attempts.clone();
    Mock::given(method("GET"))
        .and(path("/gettoken"))
        .respond_with(move |_: &wiremock::Request| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "errcode": 40001,
                    "errmsg": "invalid credential"
                }))
            } else {
                token_response("recovered", 7200)
            }
        })
        .mount(&server)
        .await;
    mount_child_ids(&server).await;

    let client = common::client_for(&server);

    let err = client.child_department_ids(1).await.unwrap_err();
    assert!(err.is_auth());
    assert!(err.to_string().contains("40001"));
    assert!(!err.to_string().contains(common::APP_SECRET));

    client.child_department_ids(1).await.unwrap();
    assert_eq!(client.access_token().await.unwrap().as_str(), "recovered");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_debug_output_hides_secrets() {
    let server = MockServer::start().await;
    common::mount_token(&server, "very-secret-token").await;

    let client = common::client_for(&server);
    let token = client.access_token().await.unwrap();

    let rendered = format!("{client:?} {token:?} {:?}", client.credentials());
    assert!(!rendered.contains("very-secret-token"));
    assert!(!rendered.contains(common::APP_SECRET));
}
