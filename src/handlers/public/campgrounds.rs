use axum::extract::{Path, State};
use serde_json::{json, Value};
use tower_sessions::Session;
use tracing::warn;

use crate::error::ApiError;
use crate::middleware::gates::CAMPGROUND_MISSING;
use crate::middleware::{ApiResponse, ApiResult, Notices};
use crate::state::AppState;

/// GET /campgrounds - Listing of every campground
pub async fn index(State(state): State<AppState>, session: Session) -> ApiResult<Value> {
    let campgrounds = state.store.list_campgrounds().await?;
    let notices = Notices::new(&session).drain().await?;
    Ok(ApiResponse::view(json!({ "campgrounds": campgrounds }), notices))
}

/// GET /campgrounds/:id - One campground with its author and reviews
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let notices = Notices::new(&session);
    let Some(campground) = state.store.find_campground_with_author(&id).await? else {
        warn!("Campground {} requested but not found", id);
        notices.error(CAMPGROUND_MISSING).await?;
        return Err(ApiError::not_found(CAMPGROUND_MISSING));
    };
    let reviews = state.store.list_reviews_with_author(&id).await?;

    Ok(ApiResponse::view(
        json!({ "campground": campground, "reviews": reviews }),
        notices.drain().await?,
    ))
}
