use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use super::super::payload;
use crate::database::models::{Campground, CampgroundFields};
use crate::middleware::{chain, ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;

/// GET /campgrounds/new - Empty campground form
pub async fn new_form(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Value> {
    let ctx = chain::NEW_CAMPGROUND.run(state.store.as_ref(), ctx).await?;
    let notices = ctx.notices().drain().await?;
    Ok(ApiResponse::view(
        json!({
            "form": "campground",
            "action": "/campgrounds",
            "method": "POST",
            "fields": ["title", "location", "price", "description", "geometry", "images"]
        }),
        notices,
    ))
}

/// POST /campgrounds - Create a campground owned by the acting user
pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Option<Json<Value>>,
) -> ApiResult<Campground> {
    let mut ctx = chain::CREATE_CAMPGROUND
        .run(state.store.as_ref(), ctx.with_payload(payload(body)))
        .await?;

    let author_id = ctx.user()?.user_id.clone();
    let fields: CampgroundFields = ctx.take_validated()?;
    let campground = state.store.create_campground(fields, &author_id).await?;
    info!("User {} created campground {} ({})", author_id, campground.id, campground.title);

    ctx.notices().success("Successfully made a new campground!").await?;
    Ok(ApiResponse::redirect(format!("/campgrounds/{}", campground.id), campground))
}
