// handlers/mod.rs - Handler tiers
//
// Public handlers read only and never run a gate chain. Protected handlers
// build a RequestContext and run their route's chain before touching the store.

pub mod public;
pub mod protected;

use axum::http::Uri;

use crate::error::ApiError;

/// Router fallback for unmatched paths
pub async fn fallback(uri: Uri) -> ApiError {
    ApiError::not_found_route(format!("Page not found: {}", uri.path()))
}
