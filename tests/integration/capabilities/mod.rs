//! Capability endpoint integration tests

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use crate::common::{parse_body, request, TestApp};

#[tokio::test]
async fn test_reports_available_narrative() {
    let app = TestApp::new();

    let resp = app
        .router()
        .oneshot(request(Method::GET, "/v1/capabilities", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = parse_body(resp).await;
    assert_eq!(body["narrative"]["available"], true);
    assert!(body["narrative"].get("reason").is_none());

    let mime_types: Vec<&str> = body["thumbnail"]["supported_mime_types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(mime_types.contains(&"image/jpeg"));
    assert!(!mime_types.contains(&"application/pdf"));
}

#[tokio::test]
async fn test_reports_missing_narrative_backend() {
    let app = TestApp::unconfigured();

    let resp = app
        .router()
        .oneshot(request(Method::GET, "/v1/capabilities", None))
        .await
        .unwrap();

    let body = parse_body(resp).await;
    assert_eq!(body["narrative"]["available"], false);
    assert!(body["narrative"]["reason"].is_string());
    assert_eq!(app.llm.calls(), 0);
}
