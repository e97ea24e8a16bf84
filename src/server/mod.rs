//! HTTP server layer for zip-link.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │   GET /get-signed-url/{id}          GET /download/{id}          │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │          routes             │  │
//! │  │ (outcome -> response)    │  │  (router, CORS, tracing)    │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    download_handler, frontend_redirect_handler, health_handler, signed_url_handler, AppState,
    DownloadError, HealthResponse, SignedUrlError, SignedUrlResponse,
};
pub use routes::{create_router, RouterConfig};
