//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use zip_link::{create_router, LinkService, ObjectKey, ObjectStore, RouterConfig, StoreError};

pub const MOCK_BUCKET: &str = "archives";

/// How the mock store misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Every call succeeds
    None,
    /// `exists` fails with a non-404 error
    ProbeOutage,
    /// `presign_get` fails
    PresignOutage,
    /// `exists` never answers within any reasonable deadline
    ProbeStall,
}

/// Counts of calls made against a [`MockObjectStore`].
#[derive(Debug, Clone, Default)]
pub struct CallCounts {
    probes: Arc<AtomicUsize>,
    presigns: Arc<AtomicUsize>,
}

impl CallCounts {
    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn presigns(&self) -> usize {
        self.presigns.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.probes() + self.presigns()
    }
}

/// In-memory object store holding a set of keys.
///
/// Presigned URLs look like
/// `https://mock-store.test/archives/42.zip?expires=900&signature=sig-0`,
/// with a counter in the signature so every URL is distinct.
pub struct MockObjectStore {
    objects: HashSet<String>,
    failure: Failure,
    counts: CallCounts,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: HashSet::new(),
            failure: Failure::None,
            counts: CallCounts::default(),
        }
    }

    pub fn with_object(mut self, key: impl Into<String>) -> Self {
        self.objects.insert(key.into());
        self
    }

    pub fn with_failure(mut self, failure: Failure) -> Self {
        self.failure = failure;
        self
    }

    /// Handle to the call counters that survives moving the store into a router.
    pub fn counts(&self) -> CallCounts {
        self.counts.clone()
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn exists(&self, key: &ObjectKey) -> Result<(), StoreError> {
        self.counts.probes.fetch_add(1, Ordering::SeqCst);

        match self.failure {
            Failure::ProbeOutage => {
                return Err(StoreError::S3(
                    "dispatch failure: connection refused (http://10.0.0.5:9000)".to_string(),
                ))
            }
            Failure::ProbeStall => {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            Failure::None | Failure::PresignOutage => {}
        }

        if self.objects.contains(key.as_str()) {
            Ok(())
        } else {
            Err(StoreError::NotFound(format!("mock://{}/{}", MOCK_BUCKET, key)))
        }
    }

    async fn presign_get(&self, key: &ObjectKey, ttl: Duration) -> Result<String, StoreError> {
        let n = self.counts.presigns.fetch_add(1, Ordering::SeqCst);

        if self.failure == Failure::PresignOutage {
            return Err(StoreError::Presign(
                "InvalidAccessKeyId: AKIAEXAMPLE".to_string(),
            ));
        }

        Ok(format!(
            "https://mock-store.test/{}/{}?expires={}&signature=sig-{}",
            MOCK_BUCKET,
            key,
            ttl.as_secs(),
            n
        ))
    }

    fn bucket(&self) -> &str {
        MOCK_BUCKET
    }
}

/// Build a router around `store` with default configuration.
pub fn router_for(store: MockObjectStore) -> Router {
    router_with_config(store, RouterConfig::new().with_tracing(false))
}

pub fn router_with_config(store: MockObjectStore, config: RouterConfig) -> Router {
    create_router(LinkService::new(store), config)
}

/// Send a GET request through the router.
pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.clone().oneshot(request).await.unwrap()
}

/// Send a GET request with an `Origin` header.
pub async fn get_with_origin(router: &Router, uri: &str, origin: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("origin", origin)
        .body(Body::empty())
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Identifiers that must never reach storage.
pub const INVALID_IDENTIFIERS: &[&str] = &[
    "abc",
    "42a",
    "-1",
    "4.2",
    "42.zip",
    "%20",
    "..%2F42",
    "%2e%2e%2f%2e%2e%2fetc%2fpasswd",
    "%EF%BC%94%EF%BC%92",
    "%FF",
    "4%FF2",
];
