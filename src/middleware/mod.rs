//! Per-request authorization pipeline.
//!
//! Handlers build a [`RequestContext`] from the request and run it through the
//! route's [`Chain`]: login, then ownership, then payload validation. The first
//! rejecting gate ends the request with its [`ApiError`](crate::error::ApiError).

pub mod chain;
pub mod context;
pub mod gates;
pub mod notices;
pub mod response;

pub use chain::{Chain, Gate, GateOutcome};
pub use context::RequestContext;
pub use notices::{NoticeKind, NoticeQueue, Notices};
pub use response::{ApiResponse, ApiResult};
