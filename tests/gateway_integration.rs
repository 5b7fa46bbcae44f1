//! Whole-system behavior through `axum::Router`, following the teacher's
//! `tests/qa_0x14b_independent.rs` convention of exercising end-to-end
//! behavior rather than a single unit. Drives scenarios S1, S2, S3, S4, S5
//! from `spec.md` §8 via `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use order_gateway::config::AppConfig;
use order_gateway::gateway::build_router;
use order_gateway::gateway::state::AppState;

fn test_router() -> Router {
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        batch_size: 10,
        log_json: false,
    };
    build_router(Arc::new(AppState::new(config)))
}

async fn post_batch(router: &Router, key: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/orders/batch")
        .header("content-type", "application/json")
        .header("Idempotency-Key", key)
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

async fn get_order(router: &Router, id: &str) -> (StatusCode, Value, axum::http::HeaderMap) {
    let request = Request::builder().method("GET").uri(format!("/api/orders/{id}")).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json, headers)
}

fn s1_body() -> Value {
    json!([
        {"id": "O1", "status": "PENDING", "amount": 10, "createdAt": 1, "updatedAt": 1},
        {"id": "O2", "status": "PENDING", "amount": 20, "createdAt": 1, "updatedAt": 1},
    ])
}

#[tokio::test]
async fn s1_happy_batch() {
    let router = test_router();
    let (status, body) = post_batch(&router, "abc-123", s1_body()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["total"], json!(2));
    assert_eq!(body["processed"], json!(2));
    assert_eq!(body["failed"], json!(0));
    assert_eq!(body["batches"], json!(1));
    assert_eq!(body["batchResults"][0]["batchIndex"], json!(0));
    assert_eq!(body["batchResults"][0]["processed"], json!(2));
    assert_eq!(body["batchResults"][0]["failed"], json!(0));
}

#[tokio::test]
async fn s2_idempotent_replay_returns_identical_body_without_reprocessing() {
    let router = test_router();
    let (status1, body1) = post_batch(&router, "replay-key", s1_body()).await;
    let (status2, body2) = post_batch(&router, "replay-key", s1_body()).await;

    assert_eq!(status1, status2);
    assert_eq!(body1, body2);
}

#[tokio::test]
async fn s3_mixed_batch_isolates_failure() {
    let router = test_router();
    let body = json!([
        {"id": "A", "status": "PENDING", "amount": 1, "createdAt": 1, "updatedAt": 1},
        {"id": "B", "status": "PENDING", "amount": -1, "createdAt": 1, "updatedAt": 1},
        {"id": "C", "status": "PENDING", "amount": 2, "createdAt": 1, "updatedAt": 1},
    ]);

    // Chunk size of 2 requires a configured BATCH_SIZE smaller than the
    // default test router's.
    let config = AppConfig { host: "127.0.0.1".to_string(), port: 0, batch_size: 2, log_json: false };
    let router = build_router(Arc::new(AppState::new(config)));

    let (status, resp) = post_batch(&router, "mixed-key", body).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["processed"], json!(2));
    assert_eq!(resp["failed"], json!(1));
    assert_eq!(resp["batches"], json!(2));
    let first_chunk_errors = resp["batchResults"][0]["errors"].as_array().unwrap();
    assert!(first_chunk_errors.iter().any(|e| e.as_str().unwrap().contains("Order B")));
}

#[tokio::test]
async fn s4_read_through_cache_and_freshness_over_hit_rate() {
    let router = test_router();
    post_batch(&router, "s4-key", s1_body()).await;

    let (status, _body, headers) = get_order(&router, "O1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("X-Cache").unwrap(), "MISS");

    let (status, _body, headers) = get_order(&router, "O1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("X-Cache").unwrap(), "HIT");
    assert!(headers.contains_key("X-Cache-Age"));

    let update_request = Request::builder()
        .method("PUT")
        .uri("/api/orders/O1/status")
        .header("content-type", "application/json")
        .body(Body::from(json!({"status": "COMPLETED"}).to_string()))
        .unwrap();
    let update_response = router.clone().oneshot(update_request).await.unwrap();
    assert_eq!(update_response.status(), StatusCode::OK);

    let (status, body, _headers) = get_order(&router, "O1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("COMPLETED"));
}

#[tokio::test]
async fn s5_oversize_batch_is_rejected_and_cached() {
    let router = test_router();
    let items: Vec<Value> = (0..1001)
        .map(|i| json!({"id": format!("O{i}"), "status": "PENDING", "amount": 1, "createdAt": 1, "updatedAt": 1}))
        .collect();

    let (status, body) = post_batch(&router, "oversize-key", json!(items)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["message"], json!("Maximum 1000 orders allowed per request"));

    // Retry with the same key returns the identical cached 413.
    let (status2, body2) = post_batch(&router, "oversize-key", json!(items)).await;
    assert_eq!(status2, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body2, body);
}

#[tokio::test]
async fn missing_idempotency_key_is_rejected() {
    let router = test_router();
    let request = Request::builder()
        .method("POST")
        .uri("/api/orders/batch")
        .header("content-type", "application/json")
        .body(Body::from(s1_body().to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_order_id_is_not_found() {
    let router = test_router();
    let (status, body, _headers) = get_order(&router, "missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Not found"));
}

#[tokio::test]
async fn health_and_memory_endpoints_respond() {
    let router = test_router();

    let request = Request::builder().uri("/api/system/health").body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder().uri("/api/system/memory").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
