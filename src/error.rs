use std::time::Duration;

use thiserror::Error;

/// Errors returned by an object store backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Error from S3 or S3-compatible storage
    #[error("S3 error: {0}")]
    S3(String),

    /// The presigned request could not be built
    #[error("Presign error: {0}")]
    Presign(String),

    /// The backend did not answer within the per-call deadline
    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl StoreError {
    /// Whether this error means the object is absent rather than unreachable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Identifier rejected by the key resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Identifier was the empty string
    #[error("identifier is empty")]
    Empty,

    /// Identifier contains something other than ASCII digits
    #[error("identifier must contain only digits: {0:?}")]
    NotNumeric(String),

    /// Path segment could not be decoded into a string at all
    #[error("identifier is malformed: {0}")]
    Malformed(String),
}

/// Errors that can occur while issuing a signed link.
#[derive(Debug, Clone, Error)]
pub enum LinkError {
    /// Identifier failed validation; the store was not contacted
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] KeyError),

    /// The store failed for a reason other than absence
    #[error("Storage failure for {key}: {source}")]
    Storage {
        key: String,
        #[source]
        source: StoreError,
    },
}
