//! HTTP request handlers for the zip-link API.
//!
//! Handlers are a pure translation layer: they call [`LinkService`] and map
//! its outcome to a status code and body. No handler inspects storage errors
//! beyond their variant, and none echoes backend error text.
//!
//! # Endpoints
//!
//! - `GET /get-signed-url/{identifier}` - Issue a signed URL as JSON
//! - `GET /download/{identifier}` - Redirect to a signed URL
//! - `GET /redirect` - Redirect to the configured frontend
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{KeyError, LinkError};
use crate::link::{LinkOutcome, LinkService};
use crate::store::ObjectStore;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the link service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: ObjectStore> {
    /// The link service for processing issuance requests
    pub link_service: Arc<LinkService<S>>,

    /// Frontend origin for `/redirect` (None when any origin is allowed)
    pub frontend_url: Option<String>,
}

impl<S: ObjectStore> AppState<S> {
    pub fn new(link_service: LinkService<S>) -> Self {
        Self {
            link_service: Arc::new(link_service),
            frontend_url: None,
        }
    }

    /// Set the frontend URL targeted by `/redirect`.
    pub fn with_frontend_url(mut self, frontend_url: Option<String>) -> Self {
        self.frontend_url = frontend_url;
        self
    }
}

impl<S: ObjectStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            link_service: Arc::clone(&self.link_service),
            frontend_url: self.frontend_url.clone(),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Body of `GET /get-signed-url/{identifier}` for every status.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedUrlResponse {
    #[serde(rename = "signedUrl")]
    pub signed_url: Option<String>,
}

impl SignedUrlResponse {
    pub fn found(url: impl Into<String>) -> Self {
        Self {
            signed_url: Some(url.into()),
        }
    }

    pub fn empty() -> Self {
        Self { signed_url: None }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

const INVALID_IDENTIFIER_MESSAGE: &str = "Invalid identifier: must be a non-empty string of digits";
const NOT_FOUND_MESSAGE: &str = "Archive not found";
const INTERNAL_ERROR_MESSAGE: &str = "Could not generate download link, please try again later";
const FRONTEND_UNSET_MESSAGE: &str = "Frontend URL is not configured";

// =============================================================================
// Error Mapping
// =============================================================================

/// Status code for a failed issuance.
///
/// Storage failures are already logged with key and cause by the service, so
/// only client errors are logged here.
fn error_status(err: &LinkError) -> StatusCode {
    match err {
        LinkError::InvalidIdentifier(reason) => {
            warn!(status = 400, reason = %reason, "Client error: invalid identifier");
            StatusCode::BAD_REQUEST
        }
        LinkError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Issuance failure rendered in the JSON shape of the signed-URL endpoint.
pub struct SignedUrlError(pub LinkError);

impl IntoResponse for SignedUrlError {
    fn into_response(self) -> Response {
        let status = error_status(&self.0);
        (status, Json(SignedUrlResponse::empty())).into_response()
    }
}

impl From<LinkError> for SignedUrlError {
    fn from(err: LinkError) -> Self {
        SignedUrlError(err)
    }
}

/// Issuance failure rendered as a plain-text message for the download endpoint.
pub struct DownloadError(pub LinkError);

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        let status = error_status(&self.0);
        let message = match self.0 {
            LinkError::InvalidIdentifier(_) => INVALID_IDENTIFIER_MESSAGE,
            LinkError::Storage { .. } => INTERNAL_ERROR_MESSAGE,
        };
        (status, message).into_response()
    }
}

impl From<LinkError> for DownloadError {
    fn from(err: LinkError) -> Self {
        DownloadError(err)
    }
}

/// Extract the identifier segment, treating undecodable paths (e.g. `%FF`)
/// as invalid identifiers so each endpoint keeps its own 400 body.
fn path_identifier(path: Result<Path<String>, PathRejection>) -> Result<String, LinkError> {
    path.map(|Path(identifier)| identifier)
        .map_err(|rejection| KeyError::Malformed(rejection.body_text()).into())
}

// =============================================================================
// Handlers
// =============================================================================

/// Issue a signed download URL.
///
/// # Endpoint
///
/// `GET /get-signed-url/{identifier}`
///
/// # Response
///
/// Always `{"signedUrl": string | null}`:
///
/// - `200 OK` with a URL when the archive exists
/// - `200 OK` with `null` when it does not
/// - `400 Bad Request` with `null` for a non-numeric or undecodable identifier
/// - `500 Internal Server Error` with `null` on storage failure
pub async fn signed_url_handler<S: ObjectStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<SignedUrlResponse>, SignedUrlError> {
    let identifier = path_identifier(path)?;
    let outcome = state.link_service.issue_for(&identifier).await?;

    let response = match outcome {
        LinkOutcome::Found(link) => SignedUrlResponse::found(link.url),
        LinkOutcome::NotFound => SignedUrlResponse::empty(),
    };

    Ok(Json(response))
}

/// Redirect to a signed download URL.
///
/// # Endpoint
///
/// `GET /download/{identifier}`
///
/// # Response
///
/// - `302 Found` with `Location` set to the signed URL
/// - `400 Bad Request` for a non-numeric or undecodable identifier
/// - `404 Not Found` when the archive does not exist
/// - `500 Internal Server Error` on storage failure
pub async fn download_handler<S: ObjectStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, DownloadError> {
    let identifier = path_identifier(path)?;
    let outcome = state.link_service.issue_for(&identifier).await?;

    let response = match outcome {
        LinkOutcome::Found(link) => {
            debug!(key = %link.key, "Redirecting download");
            (StatusCode::FOUND, [(header::LOCATION, link.url)]).into_response()
        }
        LinkOutcome::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response(),
    };

    Ok(response)
}

/// Redirect to the configured frontend.
///
/// # Endpoint
///
/// `GET /redirect`
///
/// # Response
///
/// - `302 Found` to the frontend URL
/// - `400 Bad Request` when the server runs with an open (`*`) origin
pub async fn frontend_redirect_handler<S: ObjectStore>(
    State(state): State<AppState<S>>,
) -> Response {
    match state.frontend_url {
        Some(url) => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        None => (StatusCode::BAD_REQUEST, FRONTEND_UNSET_MESSAGE).into_response(),
    }
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
