use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::{error, info};

use super::super::payload;
use crate::database::models::{Campground, CampgroundFields};
use crate::error::ApiError;
use crate::middleware::{chain, ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;

/// GET /campgrounds/:id/edit - Edit form prefilled with the owned campground
pub async fn edit_form(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Value> {
    let mut ctx = chain::EDIT_CAMPGROUND.run(state.store.as_ref(), ctx).await?;
    let campground = ctx.take_campground()?;
    let notices = ctx.notices().drain().await?;
    Ok(ApiResponse::view(
        json!({
            "form": "campground",
            "action": format!("/campgrounds/{}", campground.id),
            "method": "PUT",
            "campground": campground
        }),
        notices,
    ))
}

/// PUT /campgrounds/:id - Replace the editable fields; the author never changes
pub async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Option<Json<Value>>,
) -> ApiResult<Campground> {
    let mut ctx = chain::UPDATE_CAMPGROUND
        .run(state.store.as_ref(), ctx.with_payload(payload(body)))
        .await?;

    let mut campground = ctx.take_campground()?;
    let fields: CampgroundFields = ctx.take_validated()?;
    campground.apply(fields);
    state.store.update_campground(&campground).await?;
    info!("Campground {} updated by {}", campground.id, ctx.user()?.user_id);

    ctx.notices().success("Successfully updated campground!").await?;
    Ok(ApiResponse::redirect(format!("/campgrounds/{}", campground.id), campground))
}

/// DELETE /campgrounds/:id - Remove the campground, then its reviews
pub async fn delete(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Value> {
    let mut ctx = chain::DELETE_CAMPGROUND.run(state.store.as_ref(), ctx).await?;
    let campground = ctx.take_campground()?;

    state.store.delete_campground(&campground.id).await?;
    info!("Campground {} deleted by {}", campground.id, ctx.user()?.user_id);

    // Campground is already gone; a failure here leaves orphaned reviews
    let removed = match state.store.delete_reviews_for(&campground.id).await {
        Ok(removed) => removed,
        Err(e) => {
            error!("Review cleanup failed for deleted campground {}: {}", campground.id, e);
            return Err(ApiError::internal_failure(format!(
                "review cleanup for campground {}: {}",
                campground.id, e
            )));
        }
    };

    ctx.notices().success("Successfully deleted campground").await?;
    Ok(ApiResponse::redirect(
        "/campgrounds",
        json!({ "deleted": campground.id, "reviews_deleted": removed }),
    ))
}
