//! # zip-link
//!
//! Issues short-lived pre-signed download URLs for `<identifier>.zip` archives
//! stored in S3-compatible object storage, and optionally proxies the
//! download with a redirect.
//!
//! ## Architecture
//!
//! - [`link`] - Identifier validation, key derivation and the [`LinkService`]
//! - [`store`] - The [`ObjectStore`] trait and its S3 implementation
//! - [`server`] - Axum handlers and router
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use zip_link::{create_router, create_s3_client, LinkService, RouterConfig, S3ObjectStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = create_s3_client(None, "us-east-1", None).await;
//!     let store = S3ObjectStore::new(client, "archives");
//!     let router = create_router(LinkService::new(store), RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod link;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::{
    CheckConfig, Cli, Command, ServeConfig, SignConfig, SignOutputFormat, StoreArgs,
};
pub use error::{KeyError, LinkError, StoreError};
pub use link::{
    resolve, LinkOutcome, LinkService, ObjectKey, SignedLink, DEFAULT_STORE_TIMEOUT,
    SIGNED_URL_TTL,
};
pub use server::{
    create_router, download_handler, health_handler, signed_url_handler, AppState,
    HealthResponse, RouterConfig, SignedUrlResponse,
};
pub use store::{create_s3_client, ObjectStore, S3ObjectStore, StoreCredentials};
