//! HTTP routing for the gateway
//!
//! The whole surface is one endpoint family:
//! - GET /                → HTML list of bucket names
//! - GET /{bucket}        → HTML list of object keys (descending)
//! - GET /{bucket}/{key}  → raw object bytes
//!
//! Because bucket names and keys can be arbitrary path segments, the
//! router does not carve out per-segment routes; a single GET fallback
//! receives every path and the handler parses it itself.

mod handlers;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::storage::StorageBackend;

/// Create the gateway router.
pub fn create_router(storage: Arc<dyn StorageBackend>) -> Router {
    Router::new()
        .fallback(get(handlers::browse))
        .with_state(storage)
}
