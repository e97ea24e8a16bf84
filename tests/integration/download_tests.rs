//! Download redirect tests.

use axum::http::StatusCode;

use super::test_utils::{
    body_json, body_text, get, router_for, Failure, MockObjectStore, INVALID_IDENTIFIERS,
};

#[tokio::test]
async fn test_download_redirects_to_signed_url() {
    let router = router_for(MockObjectStore::new().with_object("42.zip"));

    let response = get(&router, "/download/42").await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let location = response
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("https://mock-store.test/archives/42.zip?"));
    assert!(location.contains("expires=900"));

    assert!(body_text(response).await.is_empty());
}

#[tokio::test]
async fn test_download_location_matches_fetch_link_shape() {
    let router = router_for(MockObjectStore::new().with_object("7.zip"));

    let fetched = body_json(get(&router, "/get-signed-url/7").await).await;
    let fetched = fetched["signedUrl"].as_str().unwrap().to_string();

    let response = get(&router, "/download/7").await;
    let location = response.headers().get("location").unwrap().to_str().unwrap();

    // Each call signs anew, so compare everything before the query string
    let base = |url: &str| url.split('?').next().unwrap().to_string();
    assert_eq!(base(location), base(&fetched));
}

#[tokio::test]
async fn test_download_missing_archive_is_404() {
    let router = router_for(MockObjectStore::new());

    let response = get(&router, "/download/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get("location").is_none());
    assert!(!body_text(response).await.is_empty());
}

#[tokio::test]
async fn test_download_invalid_identifier_is_400() {
    let store = MockObjectStore::new().with_object("42.zip");
    let counts = store.counts();
    let router = router_for(store);

    for identifier in INVALID_IDENTIFIERS {
        let response = get(&router, &format!("/download/{}", identifier)).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "{identifier:?} should be rejected"
        );
        assert!(body_text(response).await.contains("Invalid identifier"));
    }

    assert_eq!(counts.total(), 0);
}

#[tokio::test]
async fn test_download_undecodable_identifier_uses_own_message() {
    let router = router_for(MockObjectStore::new().with_object("42.zip"));

    let response = get(&router, "/download/%FF").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let text = body_text(response).await;
    assert!(text.starts_with("Invalid identifier"));
    assert!(!text.contains("UTF-8"));
}

#[tokio::test]
async fn test_download_outage_is_500_without_location() {
    let router = router_for(
        MockObjectStore::new()
            .with_object("42.zip")
            .with_failure(Failure::ProbeOutage),
    );

    let response = get(&router, "/download/42").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get("location").is_none());

    let text = body_text(response).await;
    assert!(!text.contains("10.0.0.5"));
    assert!(!text.contains("connection refused"));
}

#[tokio::test]
async fn test_download_presign_outage_is_500() {
    let router = router_for(
        MockObjectStore::new()
            .with_object("42.zip")
            .with_failure(Failure::PresignOutage),
    );

    let response = get(&router, "/download/42").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body_text(response).await.contains("AKIA"));
}
