// tests/api_http.rs
//
// HTTP-level tests for the public Router without opening sockets.
// The router is exercised directly via tower::ServiceExt::oneshot.

mod common;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use ai_discovery_digest::{router, AppState};
use common::{harness, Harness};

const BODY_LIMIT: usize = 1024 * 1024;

fn app(h: Harness) -> Router {
    router(AppState::new(h.pipeline))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    (status, String::from_utf8(bytes.to_vec()).expect("utf8"))
}

#[tokio::test]
async fn health_returns_ok() {
    let (status, body) = get(app(harness(Some("<p>x</p>"), 0)), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn send_newsletter_success_body() {
    let (status, body) = get(app(harness(Some("<p>x</p>"), 1)), "/send-newsletter").await;
    assert_eq!(status, StatusCode::OK, "body: {body}");

    let v: Json = serde_json::from_str(&body).expect("json");
    assert_eq!(v["success"], true);
    assert_eq!(v["message"], "Newsletter generated and sent successfully!");
    assert_eq!(v["details"]["attempt"], 2);
    assert_eq!(v["details"]["status"], "success");
    assert_eq!(v["details"]["sent"], 42);
    assert!(v["details"]["subject"]
        .as_str()
        .unwrap()
        .starts_with("What's Trending in AI: "));
}

#[tokio::test]
async fn send_newsletter_delivery_failure_is_500() {
    let (status, body) = get(app(harness(Some("<p>x</p>"), usize::MAX)), "/send-newsletter").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let v: Json = serde_json::from_str(&body).expect("json");
    assert_eq!(v["success"], false);
    let error = v["error"].as_str().expect("error string");
    assert!(error.contains("after 3 attempts"), "{error}");
    assert!(error.contains("Bad gateway"), "{error}");
    assert_eq!(v["details"]["attempts"], 3);
}

#[tokio::test]
async fn send_newsletter_generation_failure_is_500() {
    let (status, body) = get(app(harness(None, 0)), "/send-newsletter").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let v: Json = serde_json::from_str(&body).expect("json");
    assert_eq!(v["success"], false);
    assert!(v["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to generate newsletter content"));
    assert_eq!(v["details"], serde_json::json!({}));
}

#[tokio::test]
async fn preview_serves_html_without_sending() {
    let h = harness(Some("<article>preview</article>"), 0);
    let mail = h.mail.clone();
    let (status, body) = get(app(h), "/newsletter/preview").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<article>preview</article>"));
    assert_eq!(mail.calls(), 0);
}
