// handlers/protected/mod.rs - Handlers behind a gate chain
//
// Every handler here runs its route's Chain first, then performs at most one
// store mutation using what the gates resolved onto the RequestContext.

pub mod campgrounds;
pub mod reviews;

use axum::Json;
use serde_json::Value;

pub(crate) fn payload(body: Option<Json<Value>>) -> Option<Value> {
    body.map(|Json(value)| value)
}
