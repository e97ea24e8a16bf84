//! Signed download link issuance.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │ identifier
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │   resolve()  "42" ──► ObjectKey(42.zip) │
//! └────────────────────┬────────────────────┘
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              LinkService                │
//! │   exists() ──► presign_get(900s)        │
//! └────────────────────┬────────────────────┘
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          ObjectStore (S3, ...)          │
//! └─────────────────────────────────────────┘
//! ```

mod key;
mod service;

pub use key::{resolve, ObjectKey, ARCHIVE_EXTENSION};
pub use service::{
    LinkOutcome, LinkService, SignedLink, DEFAULT_STORE_TIMEOUT, SIGNED_URL_TTL,
};
