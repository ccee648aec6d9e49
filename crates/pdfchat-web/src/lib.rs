//! Standalone PDF upload service.
//!
//! Exposes a single route that accepts a multipart upload and echoes the
//! filename. It does not touch the chat history store.

pub mod upload;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use tower_http::trace::TraceLayer;

pub use upload::{UploadError, UploadResponse, upload_pdf};

/// Build the router with a request body cap of `max_upload_bytes`.
pub fn router(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/upload_pdf/", post(upload_pdf))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}
