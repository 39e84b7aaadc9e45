use dingtalk_sdk::api::{ApprovalInstanceIdsRequest, Language};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer};

use crate::common::{self, envelope};

async fn mount_tree(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/topapi/v2/department/get"))
        .respond_with(envelope(serde_json::json!({
            "result": {"dept_id": 1, "name": "示例公司", "parent_id": 0}
        })))
        .mount(server)
        .await;

    let subs = [
        (1, serde_json::json!([
            {"dept_id": 10, "name": "研发部", "parent_id": 1},
            {"dept_id": 20, "name": "销售部", "parent_id": 1}
        ])),
        (10, serde_json::json!([{"dept_id": 11, "name": "平台组", "parent_id": 10}])),
        (11, serde_json::json!([])),
        (20, serde_json::json!([])),
    ];
    for (dept_id, result) in subs {
        Mock::given(method("POST"))
            .and(path("/topapi/v2/department/listsub"))
            .and(body_partial_json(serde_json::json!({"dept_id": dept_id})))
            .respond_with(envelope(serde_json::json!({"result": result})))
            .expect(1)
            .mount(server)
            .await;
    }
}

async fn mount_members(server: &MockServer, dept_id: u64, users: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/topapi/v2/user/list"))
        .and(body_partial_json(serde_json::json!({"dept_id": dept_id})))
        .respond_with(envelope(serde_json::json!({
            "result": {"has_more": false, "list": users}
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_walk_tree_and_collect_members() {
    let server = MockServer::start().await;
    common::mount_token(&server, "dir-token").await;
    mount_tree(&server).await;

    mount_members(&server, 1, serde_json::json!([{"userid": "boss", "name": "老板", "dept_id_list": [1]}])).await;
    mount_members(
        &server,
        10,
        serde_json::json!([
            {"userid": "dev1", "name": "开发一", "dept_id_list": [10, 11]},
            {"userid": "dev2", "name": "开发二", "dept_id_list": [10]}
        ]),
    )
    .await;
    mount_members(&server, 11, serde_json::json!([{"userid": "dev1", "name": "开发一", "dept_id_list": [10, 11]}])).await;
    mount_members(&server, 20, serde_json::json!([{"userid": "sales1", "name": "销售一", "dept_id_list": [20]}])).await;

    let client = common::client_for(&server);
    let tree = client.department_tree(1, Language::Chinese).await.unwrap();
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.dept_ids(), vec![1, 10, 11, 20]);

    let users = client.users_in_departments(&tree.dept_ids()).await.unwrap();
    let ids: Vec<_> = users.iter().map(|u| u.userid.as_str()).collect();
    assert_eq!(ids, vec!["boss", "dev1", "dev2", "sales1"]);
}

#[tokio::test]
async fn test_descendant_ids_match_tree() {
    let server = MockServer::start().await;
    common::mount_token(&server, "dir-token").await;

    for (dept_id, children) in [(1u64, vec![10u64, 20]), (10, vec![11]), (11, vec![]), (20, vec![])] {
        Mock::given(method("POST"))
            .and(path("/topapi/v2/department/listsubid"))
            .and(body_partial_json(serde_json::json!({"dept_id": dept_id})))
            .respond_with(envelope(serde_json::json!({"result": {"dept_id_list": children}})))
            .mount(&server)
            .await;
    }

    let client = common::client_for(&server);
    let mut ids = client.descendant_department_ids(&[1]).await.unwrap();
    assert_eq!(ids, vec![11, 10, 20]);

    ids.sort_unstable();
    assert_eq!(ids, vec![10, 11, 20]);
}

#[tokio::test]
async fn test_approval_listing_then_details() {
    let server = MockServer::start().await;
    common::mount_token(&server, "dir-token").await;

    Mock::given(method("POST"))
        .and(path("/topapi/process/get_by_name"))
        .respond_with(envelope(serde_json::json!({"process_code": "PROC-LEAVE"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/topapi/processinstance/listids"))
        .and(body_partial_json(serde_json::json!({"process_code": "PROC-LEAVE"})))
        .respond_with(envelope(serde_json::json!({"result": {"list": ["pi-1", "pi-2"]}})))
        .expect(1)
        .mount(&server)
        .await;
    for (id, result) in [("pi-1", "agree"), ("pi-2", "refuse")] {
        Mock::given(method("POST"))
            .and(path("/topapi/processinstance/get"))
            .and(body_partial_json(serde_json::json!({"process_instance_id": id})))
            .respond_with(envelope(serde_json::json!({
                "process_instance": {"title": id, "status": "COMPLETED", "result": result}
            })))
            .mount(&server)
            .await;
    }

    let client = common::client_for(&server);
    let code = client.process_code_by_name("请假").await.unwrap();

    let end = chrono::Utc::now();
    let start = end - chrono::Duration::days(7);
    let request = ApprovalInstanceIdsRequest::between(code, start, end);

    let mut approved = Vec::new();
    for id in client.all_approval_instance_ids(&request).await.unwrap() {
        if client.approval_instance(&id).await.unwrap().is_approved() {
            approved.push(id);
        }
    }
    assert_eq!(approved, vec!["pi-1"]);
}
