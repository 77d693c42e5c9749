//! Narrative endpoint integration tests

use axum::http::{Method, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{parse_body, request, Backend, TestApp};

fn narrative_uri(project_id: impl std::fmt::Display) -> String {
    format!("/v1/projects/{}/narrative", project_id)
}

mod test_generate_narrative {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn test_success_returns_200_with_artifact() {
        let app = TestApp::new();
        let project_id = app.create_project("Cloth Hall");

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                &narrative_uri(project_id),
                Some(r#"{"tone": "solemn", "max_tokens": 200}"#),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["artifact"]["kind"], "narrative");
        assert_eq!(body["artifact"]["project_id"], project_id.to_string());
        assert!(!body["artifact"]["content"].as_str().unwrap().is_empty());
        assert_eq!(body["artifact"]["options"]["tone"], "solemn");
        assert_eq!(body["artifact"]["options"]["max_tokens"], 200);
        assert_eq!(app.llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_body_uses_defaults() {
        let app = TestApp::new();
        let project_id = app.create_project("Belfry");

        let resp = app
            .router()
            .oneshot(request(Method::POST, &narrative_uri(project_id), None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = parse_body(resp).await;
        assert_eq!(body["artifact"]["options"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_malformed_bodies_fall_back_to_defaults() {
        let app = TestApp::new();
        let project_id = app.create_project("Beguinage");

        for raw in ["{not json", "[1, 2, 3]", "\"just a string\"", "42", r#"{"tone": 7}"#] {
            let resp = app
                .router()
                .oneshot(request(Method::POST, &narrative_uri(project_id), Some(raw)))
                .await
                .unwrap();

            assert_eq!(resp.status(), StatusCode::OK, "body {raw:?} was rejected");
        }
        assert_eq!(app.llm.calls(), 5);
    }

    #[tokio::test]
    async fn test_unconfigured_backend_returns_503_without_lookup() {
        let app = TestApp::unconfigured();
        let project_id = app.create_project("Windmill");

        let resp = app
            .router()
            .oneshot(request(Method::POST, &narrative_uri(project_id), Some("{}")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = parse_body(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
        assert_eq!(app.projects.lookups(), 0);
        assert_eq!(app.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_capability_is_checked_before_existence() {
        let app = TestApp::unconfigured();

        let resp = app
            .router()
            .oneshot(request(
                Method::POST,
                &narrative_uri(Uuid::new_v4()),
                Some("{broken"),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(app.projects.lookups(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_backend_with_invalid_id_returns_503() {
        let app = TestApp::unconfigured();

        let resp = app
            .router()
            .oneshot(request(Method::POST, &narrative_uri("not-a-uuid"), None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
        assert_eq!(app.projects.lookups(), 0);
    }

    #[tokio::test]
    async fn test_unknown_project_returns_404() {
        let app = TestApp::new();

        let resp = app
            .router()
            .oneshot(request(Method::POST, &narrative_uri(Uuid::new_v4()), None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(app.projects.lookups(), 1);
        assert_eq!(app.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_project_id_returns_400() {
        let app = TestApp::new();

        let resp = app
            .router()
            .oneshot(request(Method::POST, &narrative_uri("not-a-uuid"), None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(app.projects.lookups(), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_returns_500_with_message() {
        let app = TestApp::with(true, Backend::Failing);
        let project_id = app.create_project("Town Hall");

        let resp = app
            .router()
            .oneshot(request(Method::POST, &narrative_uri(project_id), None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "PRODUCTION_FAILED");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("Internal server error"));
        assert_eq!(app.llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_backend_timeout_returns_500() {
        let app = TestApp::with(true, Backend::Hanging);
        let project_id = app.create_project("Castle");

        let resp = app
            .router()
            .oneshot(request(Method::POST, &narrative_uri(project_id), None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "PRODUCTION_FAILED");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("timed out"));
    }

    #[tokio::test]
    async fn test_repeated_requests_each_generate() {
        let app = TestApp::new();
        let project_id = app.create_project("Abbey");
        let mut contents = Vec::new();

        for _ in 0..2 {
            let resp = app
                .router()
                .oneshot(request(Method::POST, &narrative_uri(project_id), None))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            let body = parse_body(resp).await;
            contents.push(body["artifact"]["content"].as_str().unwrap().to_string());
        }

        assert_eq!(app.llm.calls(), 2);
        assert_eq!(contents.len(), 2);
    }

    #[tokio::test]
    async fn test_get_is_not_allowed() {
        let app = TestApp::new();
        let project_id = app.create_project("Gatehouse");

        let resp = app
            .router()
            .oneshot(request(Method::GET, &narrative_uri(project_id), None))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(app.llm.calls(), 0);
    }
}
