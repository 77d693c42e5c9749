//! Router-level API tests

mod capabilities;
mod common;
mod narratives;

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use crate::common::{request, TestApp};

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let resp = app
        .router()
        .oneshot(request(Method::GET, "/health", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new();

    let resp = app
        .router()
        .oneshot(request(Method::GET, "/v1/nowhere", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
