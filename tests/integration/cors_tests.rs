//! CORS policy and frontend redirect tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use zip_link::RouterConfig;

use super::test_utils::{
    body_text, get, get_with_origin, router_for, router_with_config, MockObjectStore,
};

const FRONTEND: &str = "https://app.example.com";

fn restricted_config() -> RouterConfig {
    RouterConfig::new()
        .with_frontend_url(FRONTEND)
        .with_tracing(false)
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn test_any_origin_allowed_by_default() {
    let router = router_for(MockObjectStore::new().with_object("42.zip"));

    let response = get_with_origin(&router, "/get-signed-url/42", "https://elsewhere.test").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_configured_origin_allowed() {
    let router = router_with_config(
        MockObjectStore::new().with_object("42.zip"),
        restricted_config(),
    );

    let response = get_with_origin(&router, "/get-signed-url/42", FRONTEND).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        FRONTEND
    );
}

#[tokio::test]
async fn test_other_origin_not_allowed() {
    let router = router_with_config(
        MockObjectStore::new().with_object("42.zip"),
        restricted_config(),
    );

    let response = get_with_origin(&router, "/get-signed-url/42", "https://evil.test").await;
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_trailing_slash_in_frontend_url_still_matches_origin() {
    let router = router_with_config(
        MockObjectStore::new().with_object("42.zip"),
        RouterConfig::new()
            .with_frontend_url("https://app.example.com/")
            .with_tracing(false),
    );

    let response = get_with_origin(&router, "/get-signed-url/42", FRONTEND).await;
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        FRONTEND
    );
}

#[tokio::test]
async fn test_preflight_allows_get_and_content_type() {
    let router = router_with_config(MockObjectStore::new(), restricted_config());

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/get-signed-url/42")
        .header("origin", FRONTEND)
        .header("access-control-request-method", "GET")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), FRONTEND);
    assert!(headers
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("GET"));
    assert!(headers
        .get("access-control-allow-headers")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("content-type"));
}

// =============================================================================
// Frontend Redirect
// =============================================================================

#[tokio::test]
async fn test_redirect_to_configured_frontend() {
    let router = router_with_config(MockObjectStore::new(), restricted_config());

    let response = get(&router, "/redirect").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get("location").unwrap(), FRONTEND);
}

#[tokio::test]
async fn test_redirect_without_frontend_is_400() {
    let router = router_for(MockObjectStore::new());

    let response = get(&router, "/redirect").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("not configured"));
}
