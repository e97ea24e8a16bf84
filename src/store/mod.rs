//! Object store abstraction.
//!
//! The [`ObjectStore`] trait is the seam between the link service and the
//! storage backend. It exposes exactly the two operations the service needs:
//! a metadata-only existence probe and GET-URL presigning.
//!
//! Backends translate their own error shapes into [`StoreError`], so callers
//! only ever see `StoreError::NotFound` for absence and other variants for
//! failures.

mod s3;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::link::ObjectKey;

pub use s3::{create_s3_client, S3ObjectStore, StoreCredentials};

/// A storage backend that can probe objects and presign downloads.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Check that the object exists without fetching its content.
    ///
    /// Returns `StoreError::NotFound` when the object is absent.
    async fn exists(&self, key: &ObjectKey) -> Result<(), StoreError>;

    /// Produce a URL granting GET access to the object for `ttl`.
    async fn presign_get(&self, key: &ObjectKey, ttl: Duration) -> Result<String, StoreError>;

    /// Bucket the store reads from.
    fn bucket(&self) -> &str;
}
