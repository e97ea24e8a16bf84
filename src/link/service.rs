//! Signed link issuance.
//!
//! # Flow
//!
//! ```text
//! issue(key)
//!   │
//!   ├─ exists(key) ──── NotFound ──────────────► Ok(LinkOutcome::NotFound)
//!   │        └───────── other error / timeout ─► Err(LinkError::Storage)
//!   │
//!   └─ presign_get(key, 900s) ─ error / timeout ► Err(LinkError::Storage)
//!            └────────────────────────────────► Ok(LinkOutcome::Found)
//! ```
//!
//! The probe runs before signing so that callers never receive a URL that
//! would 404 at download time.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, error};

use crate::error::{LinkError, StoreError};
use crate::store::ObjectStore;

use super::key::{resolve, ObjectKey};

/// Lifetime of every issued URL (15 minutes).
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(900);

/// Default deadline for a single object store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Outcome Types
// =============================================================================

/// A freshly issued download URL.
#[derive(Debug, Clone)]
pub struct SignedLink {
    /// Fully qualified presigned URL
    pub url: String,

    /// Key the URL grants access to
    pub key: ObjectKey,

    /// How long the URL stays valid after issuance
    pub ttl: Duration,

    /// Unix timestamp (seconds) after which the URL is rejected
    pub expires_at: u64,
}

/// Successful result of an issuance attempt.
#[derive(Debug, Clone)]
pub enum LinkOutcome {
    /// The object exists and a URL was signed
    Found(SignedLink),

    /// The object is absent; a normal outcome, not an error
    NotFound,
}

impl LinkOutcome {
    /// The signed URL, if one was issued.
    pub fn url(&self) -> Option<&str> {
        match self {
            LinkOutcome::Found(link) => Some(&link.url),
            LinkOutcome::NotFound => None,
        }
    }
}

// =============================================================================
// Link Service
// =============================================================================

/// Orchestrates the existence probe and URL signing against an [`ObjectStore`].
///
/// The service holds no mutable state, so one instance can serve any number
/// of concurrent requests.
pub struct LinkService<S: ObjectStore> {
    store: S,
    call_timeout: Duration,
}

impl<S: ObjectStore> LinkService<S> {
    /// Create a service with the default per-call deadline.
    pub fn new(store: S) -> Self {
        Self::with_call_timeout(store, DEFAULT_STORE_TIMEOUT)
    }

    /// Create a service with a custom per-call deadline.
    pub fn with_call_timeout(store: S, call_timeout: Duration) -> Self {
        Self {
            store,
            call_timeout,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Resolve `identifier` and issue a link for its key.
    ///
    /// Invalid identifiers fail with `LinkError::InvalidIdentifier` before the
    /// store is contacted.
    pub async fn issue_for(&self, identifier: &str) -> Result<LinkOutcome, LinkError> {
        let key = resolve(identifier)?;
        self.issue(&key).await
    }

    /// Issue a signed GET URL for `key` if the object exists.
    pub async fn issue(&self, key: &ObjectKey) -> Result<LinkOutcome, LinkError> {
        match self.bounded("HeadObject", self.store.exists(key)).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!(key = %key, "Object absent, no link issued");
                return Ok(LinkOutcome::NotFound);
            }
            Err(e) => return Err(self.storage_failure(key, e)),
        }

        let issued_at = unix_now();
        let url = self
            .bounded("PresignGetObject", self.store.presign_get(key, SIGNED_URL_TTL))
            .await
            .map_err(|e| self.storage_failure(key, e))?;

        debug!(key = %key, ttl_secs = SIGNED_URL_TTL.as_secs(), "Issued signed link");

        Ok(LinkOutcome::Found(SignedLink {
            url,
            key: key.clone(),
            ttl: SIGNED_URL_TTL,
            expires_at: issued_at + SIGNED_URL_TTL.as_secs(),
        }))
    }

    /// Check that `key` exists without signing anything.
    ///
    /// Runs under the same per-call deadline as [`issue`](Self::issue).
    pub async fn locate(&self, key: &ObjectKey) -> Result<(), StoreError> {
        self.bounded("HeadObject", self.store.exists(key)).await
    }

    /// Run a store call under the per-call deadline.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                operation,
                after: self.call_timeout,
            }),
        }
    }

    fn storage_failure(&self, key: &ObjectKey, source: StoreError) -> LinkError {
        error!(
            key = %key,
            bucket = self.store.bucket(),
            error = %source,
            "Failed to issue signed link"
        );
        LinkError::Storage {
            key: key.to_string(),
            source,
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// =============================================================================
// Tests
// =============================================================================
