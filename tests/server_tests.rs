//! # Event Server Tests
//!
//! Drives the router directly (no socket) to verify status codes and that
//! error responses never contain the provider token.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use commit_status_notifier::notifier::Bitbucket;
use commit_status_notifier::server::{router, ServerState};
use common::RecordingClient;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower::ServiceExt;

const TOKEN: &str = "ci-bot:app-password";
const PASSWORD: &str = "app-password";

fn state(client: &Arc<RecordingClient>) -> Arc<ServerState> {
    let notifier =
        Bitbucket::with_client("git@bitbucket.org:myorg/myrepo.git", Arc::clone(client) as _)
            .unwrap();
    Arc::new(ServerState::new(
        Arc::new(notifier),
        &[TOKEN.as_bytes(), PASSWORD.as_bytes()],
    ))
}

fn event_body(reason: &str, severity: &str) -> Body {
    Body::from(
        json!({
            "involvedObject": {
                "kind": "Kustomization",
                "name": "webapp",
                "namespace": "apps"
            },
            "severity": severity,
            "message": "Applied revision main/4f1c2d9",
            "reason": reason,
            "metadata": { "revision": "main/4f1c2d9" }
        })
        .to_string(),
    )
}

async fn post_event(state: Arc<ServerState>, body: Body) -> (StatusCode, String) {
    let response = router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_event_is_accepted() {
    let client = Arc::new(RecordingClient::new());

    let (status, _) = post_event(state(&client), event_body("ReconciliationSucceeded", "info")).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_transport_error_is_redacted() {
    let client = Arc::new(RecordingClient::failing(
        401,
        "bad credentials for ci-bot:app-password",
    ));

    let (status, body) = post_event(state(&client), event_body("ReconciliationSucceeded", "info")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!body.contains(TOKEN), "token leaked: {body}");
    assert!(body.contains("bad credentials for *****"), "{body}");
}

#[tokio::test]
async fn test_unsupported_severity_is_unprocessable() {
    let client = Arc::new(RecordingClient::new());

    let (status, body) = post_event(state(&client), event_body("DependencyNotReady", "trace")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("severity 'trace'"), "{body}");
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_severity_is_unprocessable() {
    let client = Arc::new(RecordingClient::new());

    let (status, body) = post_event(state(&client), event_body("ReconciliationSucceeded", "warning")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        "cannot convert severity 'warning' to a bitbucket commit status state"
    );
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_echoed_password_is_redacted() {
    let client = Arc::new(RecordingClient::failing(
        401,
        "password app-password was rejected",
    ));

    let (status, body) = post_event(state(&client), event_body("ReconciliationSucceeded", "info")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!body.contains(PASSWORD), "password leaked: {body}");
    assert!(body.contains("password ***** was rejected"), "{body}");
}

#[tokio::test]
async fn test_malformed_event_is_rejected_without_echoing_token() {
    let client = Arc::new(RecordingClient::new());
    let body = Body::from(json!({ "reason": TOKEN, "severity": 42 }).to_string());

    let (status, body) = post_event(state(&client), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.contains(TOKEN), "token leaked: {body}");
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_probes() {
    let client = Arc::new(RecordingClient::new());
    let state = state(&client);

    let get = |uri: &'static str| Request::builder().uri(uri).body(Body::empty()).unwrap();

    let response = router(Arc::clone(&state)).oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router(Arc::clone(&state)).oneshot(get("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    state.is_ready.store(true, Ordering::Relaxed);
    let response = router(Arc::clone(&state)).oneshot(get("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router(state).oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
