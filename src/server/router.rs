//! Axum router for the control-plane surface.
//!
//! ```text
//! GET  /health  - liveness probe (no auth)
//! GET  /spec    - machine-readable interface description (no auth)
//! POST /lock    - lock/unlock the vault (bearer)
//! POST /upload  - multipart file upload (bearer)
//! GET  /files   - list accepted records (no auth)
//! ```

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::constants::MAX_UPLOAD_BYTES;

use super::handlers;
use super::AppState;

/// Multipart framing overhead allowed on top of the payload limit.
const UPLOAD_BODY_OVERHEAD: usize = 64 * 1024;

/// Build the complete router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/spec", get(handlers::interface_spec))
        .route("/lock", post(handlers::set_lock))
        .route(
            "/upload",
            post(handlers::upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + UPLOAD_BODY_OVERHEAD)),
        )
        .route("/files", get(handlers::list_files))
        .with_state(state)
}
