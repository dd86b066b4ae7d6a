//! Integration tests for the observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing without
//! needing a live network connection.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use shepherd_observer::build_router;
use shepherd_observer::state::AppState;
use shepherd_types::{Event, EventKind, StreamMessage};
use tower::ServiceExt;

fn sample_event(id: u64, status: &str, kind: EventKind) -> Event {
    Event {
        id,
        kind,
        status: String::from(status),
        request: String::from("GET /index.html HTTP/1.1"),
        ip: String::from("127.0.0.1"),
        timestamp: String::from("09/Nov/2025:10:00:00 +0000"),
        size: Some(612),
        raw: String::from(
            "127.0.0.1 - - [09/Nov/2025:10:00:00 +0000] \"GET /index.html HTTP/1.1\" 200 612",
        ),
        acknowledged: false,
        ack_time: None,
    }
}

async fn make_test_state() -> Arc<AppState> {
    let state = Arc::new(AppState::new(200));
    {
        let mut store = state.store.write().await;
        store.append(sample_event(1, "200", EventKind::Normal));
        store.append(sample_event(2, "500", EventKind::Error));
    }
    state
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_list_events() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/events").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["events"][0]["id"], 1);
    assert_eq!(json["events"][1]["type"], "error");
}

#[tokio::test]
async fn test_get_event_by_id() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/events/2").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["id"], 2);
    assert_eq!(json["status"], "500");
}

#[tokio::test]
async fn test_get_event_not_found() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/events/999").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_event_invalid_id() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/events/not-a-number")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ingest_parses_and_stores() {
    let state = Arc::new(AppState::new(200));
    let router = build_router(state.clone());

    let line =
        r#"127.0.0.1 - - [09/Nov/2025:10:00:02 +0000] "GET /api/data HTTP/1.1" 500 234 "-" "curl/7.68.0""#;
    let body = serde_json::json!({ "line": line }).to_string();

    let response = router
        .oneshot(
            Request::post("/ingest")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["parsed"]["type"], "error");
    assert_eq!(json["parsed"]["status"], "500");

    let store = state.store.read().await;
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_ingest_broadcasts_new_log() {
    let state = Arc::new(AppState::new(200));
    let mut rx = state.subscribe();
    let router = build_router(state.clone());

    let body = serde_json::json!({
        "line": r#"10.0.0.9 - - [09/Nov/2025:12:00:00 +0000] "GET /missing HTTP/1.1" 404 0"#
    })
    .to_string();

    let response = router
        .oneshot(
            Request::post("/ingest")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    match rx.recv().await.unwrap() {
        StreamMessage::NewLog(event) => {
            assert_eq!(event.kind, EventKind::Warning);
            assert_eq!(event.ip, "10.0.0.9");
        }
        other => panic!("expected new_log envelope, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ingest_rejects_empty_line() {
    let state = Arc::new(AppState::new(200));
    let router = build_router(state.clone());

    let response = router
        .oneshot(
            Request::post("/ingest")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"line": "   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let store = state.store.read().await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_ingest_respects_capacity() {
    let state = Arc::new(AppState::new(5));
    {
        let mut store = state.store.write().await;
        for id in 1..=5 {
            store.append(sample_event(id, "200", EventKind::Normal));
        }
    }
    let router = build_router(state.clone());

    let body = serde_json::json!({
        "line": r#"10.0.0.1 - - [09/Nov/2025:12:00:00 +0000] "GET / HTTP/1.1" 200 1"#
    })
    .to_string();
    let response = router
        .oneshot(
            Request::post("/ingest")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let store = state.store.read().await;
    assert_eq!(store.len(), 5);
    assert!(!store.contains(1), "oldest event should be evicted");
}

#[tokio::test]
async fn test_ack_flow_marks_event_and_broadcasts() {
    // Exercises the same store mutation the WebSocket ack path performs.
    let state = make_test_state().await;
    let mut rx = state.subscribe();

    let confirmed = {
        let mut store = state.store.write().await;
        let mut event = store.get(2).cloned().unwrap();
        event.acknowledge(Utc::now());
        store.append(event.clone());
        event
    };
    state.broadcast(&StreamMessage::Ack(Box::new(confirmed)));

    match rx.recv().await.unwrap() {
        StreamMessage::Ack(event) => {
            assert_eq!(event.id, 2);
            assert!(event.acknowledged);
            assert!(event.ack_time.is_some());
        }
        other => panic!("expected ack envelope, got {other:?}"),
    }

    let store = state.store.read().await;
    assert_eq!(store.get(2).map(|e| e.acknowledged), Some(true));
    // Position and length are unchanged by the in-place replace.
    assert_eq!(store.len(), 2);
    let ids: Vec<u64> = store.events().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let state = make_test_state().await;
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
