//! HTTP API tests driven through the router without a socket

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{test_config, test_state, unused_port, ScriptedSshServer, PASSWORD};
use sg_core::traits::AuditSink;
use sg_core::{AuditRecord, ExecutionResult, RequestId};
use sg_gateway::server::router;
use sg_protocol::ConnectionSpec;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_service_info() {
    let (state, _) = test_state(test_config());

    let (status, body) = send(router(state), get("/api/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "1.0");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_execute_against_unreachable_host() {
    let (state, audit) = test_state(test_config());
    let request = post_json(
        "/api/ssh/execute",
        json!({
            "ssh": {
                "host": "127.0.0.1",
                "port": unused_port(),
                "username": "pi",
                "password": "pw",
                "command": "uptime"
            },
            "button_id": "btn-uptime"
        }),
    );

    let (status, body) = send(router(state), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["output"], body["error"]);
    assert!(body["error"].as_str().unwrap().contains("Connection"));

    let records = audit.recent_records(10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].request_id, "btn-uptime");
    assert_eq!(records[0].command, "uptime");
}

#[tokio::test]
async fn test_execute_success_has_null_error() {
    let server = ScriptedSshServer::start().await;
    let (state, _) = test_state(test_config());
    let request = post_json(
        "/api/ssh/execute",
        json!({
            "ssh": {
                "host": "127.0.0.1",
                "port": server.port,
                "username": "pi",
                "password": PASSWORD,
                "command": "echo hello"
            },
            "button_id": "btn-echo"
        }),
    );

    let (status, body) = send(router(state), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["output"], "hello\n");
    assert_eq!(body["error"], Value::Null);
    assert!(body["execution_time"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_execute_rejects_empty_host() {
    let (state, audit) = test_state(test_config());
    let request = post_json(
        "/api/ssh/execute",
        json!({
            "ssh": {"host": "", "username": "pi", "password": "pw", "command": "ls"},
            "button_id": "b1"
        }),
    );

    let (status, body) = send(router(state), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Missing required field: host");
    assert!(audit.is_empty().await);
}

#[tokio::test]
async fn test_execute_rejects_malformed_body() {
    let (state, _) = test_state(test_config());
    let request = Request::builder()
        .method("POST")
        .uri("/api/ssh/execute")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(router(state), request).await;

    assert!(status.is_client_error());
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_logs_newest_first_with_limit() {
    let (state, audit) = test_state(test_config());
    let spec = ConnectionSpec::new("pi.local", "pi", "pw", "uptime");
    for (i, id) in ["first", "second", "third"].iter().enumerate() {
        let result = ExecutionResult::completed("up".into(), String::new(), Some(0), 0.1);
        let mut record = AuditRecord::new(&RequestId::new(*id), &spec, &result);
        record.timestamp = 1_000 + i as u64;
        audit.append(record).await.unwrap();
    }

    let (status, body) = send(router(state), get("/api/ssh/logs?limit=2")).await;

    assert_eq!(status, StatusCode::OK);
    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["request_id"], "third");
    assert_eq!(logs[1]["request_id"], "second");
    assert!(logs[0].get("password").is_none());
}

#[tokio::test]
async fn test_logs_default_limit() {
    let (state, audit) = test_state(test_config());
    let spec = ConnectionSpec::new("pi.local", "pi", "pw", "uptime");
    for i in 0..60 {
        let result = ExecutionResult::failed("Connection refused", 0.1);
        audit
            .append(AuditRecord::new(&RequestId::new(i.to_string()), &spec, &result))
            .await
            .unwrap();
    }

    let (_, body) = send(router(state), get("/api/ssh/logs")).await;

    assert_eq!(body["logs"].as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn test_fetch_config_document() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("simple.json"),
        json!({"app_name": "Panel", "version": "1.0", "pages": [], "buttons": []}).to_string(),
    )
    .unwrap();
    let mut config = test_config();
    config.documents_dir = dir.path().to_path_buf();
    let (state, _) = test_state(config);

    let (status, body) = send(router(state.clone()), get("/api/config/simple")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["app_name"], "Panel");

    let (status, body) = send(router(state), get("/api/config/sample")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("sample"));
}

#[tokio::test]
async fn test_validate_config() {
    let (state, _) = test_state(test_config());

    let valid = json!({
        "app_name": "Panel",
        "version": "1.0",
        "pages": [{"pageId": "main"}],
        "buttons": [{"id": "b1", "pageId": "main", "label": "Restart"}]
    });
    let (status, body) = send(router(state.clone()), post_json("/api/config/validate", valid)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"valid": true, "message": "Configuration is valid"}));

    let dangling = json!({
        "app_name": "Panel",
        "version": "1.0",
        "pages": [{"pageId": "main"}],
        "buttons": [{"id": "b2", "pageId": "ghost"}]
    });
    let (status, body) = send(router(state.clone()), post_json("/api/config/validate", dangling)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Button b2 references non-existent pageId: ghost");

    let empty = json!({"app_name": "Panel", "version": "1.0", "pages": [], "buttons": []});
    let (status, body) = send(router(state), post_json("/api/config/validate", empty)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "At least one page is required");
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let (state, _) = test_state(test_config());
    let request = Request::builder()
        .uri("/api/")
        .header(header::ORIGIN, "http://panel.lan")
        .body(Body::empty())
        .unwrap();

    let response = router(state).oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
