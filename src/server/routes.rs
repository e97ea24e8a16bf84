//! Router configuration for zip-link.
//!
//! # Route Structure
//!
//! ```text
//! /health                        - Health check
//! /get-signed-url/{identifier}   - Signed URL as JSON
//! /download/{identifier}         - 302 to signed URL
//! /redirect                      - 302 to the frontend
//! ```
//!
//! # Example
//!
//! ```ignore
//! use zip_link::link::LinkService;
//! use zip_link::server::{create_router, RouterConfig};
//!
//! let service = LinkService::new(store);
//! let config = RouterConfig::new().with_frontend_url("https://app.example.com");
//! let router = create_router(service, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use axum::{routing::get, Router};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::handlers::{
    download_handler, frontend_redirect_handler, health_handler, signed_url_handler, AppState,
};
use crate::link::LinkService;
use crate::store::ObjectStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Frontend URL allowed by CORS and used by `/redirect` (None = any origin)
    pub frontend_url: Option<String>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a configuration allowing any origin with tracing enabled.
    pub fn new() -> Self {
        Self {
            frontend_url: None,
            enable_tracing: true,
        }
    }

    /// Restrict CORS to a single frontend origin and enable `/redirect`.
    pub fn with_frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = Some(url.into());
        self
    }

    /// Allow any CORS origin.
    pub fn with_any_origin(mut self) -> Self {
        self.frontend_url = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the application router.
///
/// All routes are public and share one CORS policy.
pub fn create_router<S>(link_service: LinkService<S>, config: RouterConfig) -> Router
where
    S: ObjectStore + 'static,
{
    let app_state = AppState::new(link_service).with_frontend_url(config.frontend_url.clone());
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route(
            "/get-signed-url/{identifier}",
            get(signed_url_handler::<S>),
        )
        .route("/download/{identifier}", get(download_handler::<S>))
        .route("/redirect", get(frontend_redirect_handler::<S>))
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([CONTENT_TYPE]);

    match config.frontend_url.as_deref() {
        None => cors.allow_origin(Any),
        Some(url) => match cors_origin(url) {
            Some(origin) => cors.allow_origin(origin),
            None => {
                // No origin allowed - this effectively disables CORS
                warn!(frontend_url = url, "Frontend URL is not a valid origin header");
                cors
            }
        },
    }
}

/// Browsers send origins without a trailing slash.
fn cors_origin(url: &str) -> Option<HeaderValue> {
    url.trim_end_matches('/').parse().ok()
}

// =============================================================================
// Tests
// =============================================================================
