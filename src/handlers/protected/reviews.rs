use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use super::payload;
use crate::database::models::{Review, ReviewFields};
use crate::error::ApiError;
use crate::middleware::gates::CAMPGROUND_MISSING;
use crate::middleware::{chain, ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;

/// POST /campgrounds/:id/reviews - Attach a review by the acting user
pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Option<Json<Value>>,
) -> ApiResult<Review> {
    let mut ctx = chain::CREATE_REVIEW
        .run(state.store.as_ref(), ctx.with_payload(payload(body)))
        .await?;

    let author_id = ctx.user()?.user_id.clone();
    let campground_id = ctx
        .campground_id
        .clone()
        .ok_or_else(|| ApiError::not_found(CAMPGROUND_MISSING))?;
    let fields: ReviewFields = ctx.take_validated()?;

    let review = state.store.create_review(&campground_id, fields, &author_id).await?;
    info!("User {} reviewed campground {} ({}/5)", author_id, campground_id, review.rating);

    ctx.notices().success("Created new review!").await?;
    Ok(ApiResponse::redirect(format!("/campgrounds/{}", campground_id), review))
}

/// DELETE /campgrounds/:id/reviews/:review_id - Remove an owned review
pub async fn delete(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Value> {
    let mut ctx = chain::DELETE_REVIEW.run(state.store.as_ref(), ctx).await?;
    let review = ctx.take_review()?;

    state.store.delete_review(&review.campground_id, &review.id).await?;
    info!("Review {} deleted by {}", review.id, ctx.user()?.user_id);

    ctx.notices().success("Successfully deleted review").await?;
    Ok(ApiResponse::redirect(
        format!("/campgrounds/{}", review.campground_id),
        json!({ "deleted": review.id }),
    ))
}
