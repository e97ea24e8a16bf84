//! S3-backed object store.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use tracing::debug;

use super::ObjectStore;
use crate::error::StoreError;
use crate::link::ObjectKey;

/// Static access key pair used instead of the default credential chain.
#[derive(Clone)]
pub struct StoreCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// S3 or S3-compatible (MinIO, R2, ...) implementation of [`ObjectStore`].
///
/// Existence is probed with `HeadObject`; links are presigned `GetObject`
/// requests, which are computed locally and never hit the network.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a store reading from `bucket` through `client`.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Confirm the bucket exists and the credentials can reach it.
    pub async fn check_bucket(&self) -> Result<(), StoreError> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| StoreError::S3(DisplayErrorContext(&e).to_string()))
    }

    fn location(&self, key: &ObjectKey) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn exists(&self, key: &ObjectKey) -> Result<(), StoreError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                let is_not_found = e
                    .as_service_error()
                    .map(|se| se.is_not_found())
                    .unwrap_or(false);

                // Some S3-compatible services answer HEAD with a bare 404 that
                // the SDK does not model as NotFound.
                let status_is_404 = e
                    .raw_response()
                    .map(|r| r.status().as_u16() == 404)
                    .unwrap_or(false);

                if is_not_found || status_is_404 {
                    debug!(location = %self.location(key), "HeadObject reported absent");
                    return Err(StoreError::NotFound(self.location(key)));
                }

                Err(StoreError::S3(DisplayErrorContext(&e).to_string()))
            }
        }
    }

    async fn presign_get(&self, key: &ObjectKey, ttl: Duration) -> Result<String, StoreError> {
        let presigning_config = PresigningConfig::expires_in(ttl)
            .map_err(|e| StoreError::Presign(format!("invalid expiration: {}", e)))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .presigned(presigning_config)
            .await
            .map_err(|e| StoreError::Presign(DisplayErrorContext(&e).to_string()))?;

        Ok(presigned.uri().to_string())
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Create an S3 client with optional custom endpoint and static credentials.
///
/// Use a custom endpoint for S3-compatible services like MinIO:
/// ```ignore
/// let client = create_s3_client(Some("http://localhost:9000"), "us-east-1", None).await;
/// ```
///
/// Without credentials the default AWS provider chain is used (environment,
/// profile, instance metadata).
pub async fn create_s3_client(
    endpoint_url: Option<&str>,
    region: &str,
    credentials: Option<StoreCredentials>,
) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    if let Some(creds) = credentials {
        config_loader = config_loader.credentials_provider(Credentials::new(
            creds.access_key_id,
            creds.secret_access_key,
            None,
            None,
            "zip-link-static",
        ));
    }

    let sdk_config = config_loader.load().await;

    // S3-compatible services generally need path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}
