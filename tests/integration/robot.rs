use std::time::Duration;

use dingtalk_sdk::client::{Backoff, ClientConfig, RetryConfig};
use dingtalk_sdk::DingTalkClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

const BATCH_SEND: &str = "/v1.0/robot/oToMessages/batchSend";

fn recipients(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("staff{i:02}")).collect()
}

async fn batch_send_requests(server: &MockServer) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == BATCH_SEND)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_rate_limited_send_is_retried() {
    let server = MockServer::start().await;
    common::mount_token(&server, "robot-token").await;

    Mock::given(method("POST"))
        .and(path(BATCH_SEND))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(BATCH_SEND))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "processQueryKey": "key-1",
            "invalidStaffIdList": ["staff01"],
            "flowControlledStaffIdList": []
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server);
    let result = client
        .send_robot_markdown("robot-1", "Notice", "## Hello", &recipients(2))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.undelivered().collect::<Vec<_>>(), vec!["staff01"]);

    let sent = batch_send_requests(&server).await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
}

#[tokio::test]
async fn test_always_failing_send_makes_four_attempts() {
    let server = MockServer::start().await;
    common::mount_token(&server, "robot-token").await;

    Mock::given(method("POST"))
        .and(path(BATCH_SEND))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let client = common::client_for(&server);
    let err = client
        .send_robot_markdown("robot-1", "Notice", "text", &recipients(25))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("after 3 retries"), "{err}");

    for body in batch_send_requests(&server).await {
        let user_ids = body["userIds"].as_array().unwrap();
        assert_eq!(user_ids.len(), 20);
        assert_eq!(user_ids.last().unwrap(), "staff19");
    }
}

#[tokio::test]
async fn test_dropping_send_cancels_backoff() {
    let server = MockServer::start().await;
    common::mount_token(&server, "robot-token").await;

    Mock::given(method("POST"))
        .and(path(BATCH_SEND))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .with_base_url(server.uri())
        .with_retry(
            RetryConfig::default()
                .with_backoff(Backoff::default().with_base_delay(Duration::from_secs(30))),
        )
        .build();
    let client = DingTalkClient::with_config(common::credentials(), config).unwrap();

    let outcome = tokio::time::timeout(
        Duration::from_millis(500),
        client.send_robot_markdown("robot-1", "t", "x", &recipients(1)),
    )
    .await;
    assert!(outcome.is_err(), "send should still be sleeping");

    // The sleeping retry was dropped, so no further attempt arrives.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(batch_send_requests(&server).await.len(), 1);
}
