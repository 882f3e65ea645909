//! HTTP control surface tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tapwatch::{create_router, AppState, Config, ManualClock};
use tower::ServiceExt;

fn app(interval: Option<u32>) -> (Router, Arc<AppState>, ManualClock) {
    let clock = ManualClock::new(0);
    let config = Config {
        interval,
        ..Config::default()
    };
    let state = Arc::new(AppState::new(&config, Arc::new(clock.clone())));
    (create_router(Arc::clone(&state)), state, clock)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn toggle_walks_through_phases() {
    let (router, _, clock) = app(None);

    let (status, body) = send(&router, "POST", "/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["statusLabel"], "tap to pause");

    clock.set(1_500);
    let (_, body) = send(&router, "POST", "/toggle", None).await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["timer"]["elapsedMillis"], 1_500);
    assert_eq!(body["timer"]["formattedTime"], "00:01.5");

    clock.set(4_000);
    let (_, body) = send(&router, "POST", "/toggle", None).await;
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["elapsedMillis"], 1_500);

    let (status, body) = send(&router, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalPausedMillis"], 2_500);
    assert_eq!(body["lastAction"], "toggle");
}

#[tokio::test]
async fn reset_returns_to_zero() {
    let (router, state, clock) = app(Some(5));
    send(&router, "POST", "/toggle", None).await;
    clock.set(12_000);
    state.tick().unwrap();

    let (status, body) = send(&router, "POST", "/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "stopped");
    assert_eq!(body["timer"]["elapsedMillis"], 0);
    assert_eq!(body["timer"]["intervalSeconds"], 5);
}

#[tokio::test]
async fn interval_accepts_numbers_text_and_null() {
    let (router, _, _) = app(None);

    let (status, body) = send(&router, "PUT", "/interval", Some(json!({ "seconds": 30 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["intervalSeconds"], 30);

    let (status, body) = send(&router, "PUT", "/interval", Some(json!({ "text": " 45 " }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["intervalSeconds"], 45);

    let (status, body) = send(&router, "PUT", "/interval", Some(json!({ "seconds": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["intervalSeconds"], Value::Null);
    assert_eq!(body["message"], "Interval disabled");
}

#[tokio::test]
async fn invalid_interval_is_rejected() {
    let (router, state, _) = app(Some(10));

    for request in [json!({ "seconds": 0 }), json!({ "seconds": -5 }), json!({ "text": "soon" })] {
        let (status, body) = send(&router, "PUT", "/interval", Some(request)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "rejected");
        assert_eq!(body["timer"]["intervalSeconds"], 10);
    }

    assert_eq!(state.get_snapshot().unwrap().interval_seconds, Some(10));
}

#[tokio::test]
async fn malformed_interval_body_is_rejected() {
    let (router, state, _) = app(Some(30));

    for request in [json!({}), json!({ "secs": 45 }), json!({ "seconds": "45" }), json!(45)] {
        let (status, body) = send(&router, "PUT", "/interval", Some(request)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "rejected");
        assert_eq!(body["timer"]["intervalSeconds"], 30);
    }

    assert_eq!(state.get_snapshot().unwrap().interval_seconds, Some(30));
    assert_eq!(state.get_last_action().0, None);
}

#[tokio::test]
async fn status_and_state_share_key_style() {
    let (router, _, clock) = app(None);
    send(&router, "POST", "/toggle", None).await;
    clock.set(2_000);
    send(&router, "POST", "/reconcile", None).await;

    let (_, status) = send(&router, "GET", "/status", None).await;
    let (_, persisted) = send(&router, "GET", "/state", None).await;
    assert_eq!(status["timer"]["elapsedMillis"], persisted["elapsedMillis"]);
    assert_eq!(status["timer"]["phase"], persisted["phase"]);
    assert!(status["timer"].get("elapsed_millis").is_none());
}

#[tokio::test]
async fn reconcile_and_persisted_state() {
    let (router, _, clock) = app(Some(30));
    send(&router, "POST", "/toggle", None).await;

    clock.set(65_000);
    let (status, body) = send(&router, "POST", "/reconcile", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["elapsedMillis"], 65_000);
    assert_eq!(body["timer"]["intervalBoundaryCrossed"], true);

    let (status, body) = send(&router, "GET", "/state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "phase": "Running",
            "elapsedMillis": 65_000,
            "pauseStartedAtMillis": null,
            "lastReferenceMillis": 65_000,
            "intervalSeconds": 30,
            "lastFlashElapsedMillis": 65_000,
        })
    );
}

#[tokio::test]
async fn health() {
    let (router, _, _) = app(None);
    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
