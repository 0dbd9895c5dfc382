use serde_json::Value;
use tracing::{debug, warn};

use super::chain::GateOutcome;
use super::context::RequestContext;
use crate::database::ResourceStore;
use crate::error::ApiError;
use crate::validation::{self, Schema, CAMPGROUND, REVIEW};

/// Session key holding the URL to resume after login
pub const RETURN_TO_KEY: &str = "return_to";

pub const LOGIN_REQUIRED: &str = "Please log in first";
pub const NOT_PERMITTED: &str = "You do not have permission to do that";
pub const CAMPGROUND_MISSING: &str = "Cannot find that campground";
pub const REVIEW_MISSING: &str = "Cannot find that review";

/// Requires a session identity
pub async fn is_logged_in(ctx: RequestContext) -> Result<GateOutcome, ApiError> {
    if ctx.current_user.is_some() {
        return Ok(GateOutcome::Continue(ctx));
    }

    warn!("Anonymous request to {} rejected", ctx.requested_url);
    ctx.session.insert(RETURN_TO_KEY, &ctx.requested_url).await?;
    ctx.notices().error(LOGIN_REQUIRED).await?;
    Ok(GateOutcome::Reject(ApiError::unauthorized(LOGIN_REQUIRED)))
}

/// Resolves the campground named in the path and requires the acting user to own it
pub async fn is_author(store: &dyn ResourceStore, mut ctx: RequestContext) -> Result<GateOutcome, ApiError> {
    let user_id = ctx.user()?.user_id.clone();
    let campground_id = ctx.campground_id.clone().unwrap_or_default();

    let Some(campground) = store.find_campground(&campground_id).await? else {
        warn!("Campground {} not found for ownership check", campground_id);
        ctx.notices().error(CAMPGROUND_MISSING).await?;
        return Ok(GateOutcome::Reject(ApiError::not_found(CAMPGROUND_MISSING)));
    };

    if !campground.author.is(&user_id) {
        warn!("User {} is not the author of campground {}", user_id, campground.id);
        ctx.notices().error(NOT_PERMITTED).await?;
        return Ok(GateOutcome::Reject(ApiError::forbidden(NOT_PERMITTED)));
    }

    ctx.campground = Some(campground);
    Ok(GateOutcome::Continue(ctx))
}

/// Resolves the review under its campground and requires the acting user to own it
pub async fn is_review_author(store: &dyn ResourceStore, mut ctx: RequestContext) -> Result<GateOutcome, ApiError> {
    let user_id = ctx.user()?.user_id.clone();
    let campground_id = ctx.campground_id.clone().unwrap_or_default();
    let review_id = ctx.review_id.clone().unwrap_or_default();

    let Some(review) = store.find_review(&campground_id, &review_id).await? else {
        warn!("Review {} not found under campground {}", review_id, campground_id);
        ctx.notices().error(REVIEW_MISSING).await?;
        return Ok(GateOutcome::Reject(ApiError::not_found(REVIEW_MISSING)));
    };

    if !review.author.is(&user_id) {
        warn!("User {} is not the author of review {}", user_id, review.id);
        ctx.notices().error(NOT_PERMITTED).await?;
        return Ok(GateOutcome::Reject(ApiError::forbidden(NOT_PERMITTED)));
    }

    ctx.review = Some(review);
    Ok(GateOutcome::Continue(ctx))
}

pub async fn validate_campground(ctx: RequestContext) -> Result<GateOutcome, ApiError> {
    validate_against(&CAMPGROUND, ctx)
}

pub async fn validate_review(ctx: RequestContext) -> Result<GateOutcome, ApiError> {
    validate_against(&REVIEW, ctx)
}

fn validate_against(schema: &'static Schema, mut ctx: RequestContext) -> Result<GateOutcome, ApiError> {
    let payload = ctx.payload.as_ref().unwrap_or(&Value::Null);
    match validation::validate(schema, payload) {
        Ok(validated) => {
            debug!("Payload accepted by {} schema", schema.name());
            ctx.validated = Some(validated);
            Ok(GateOutcome::Continue(ctx))
        }
        Err(err) => {
            warn!("Payload rejected by {} schema: {}", schema.name(), err.joined_message());
            Ok(GateOutcome::Reject(err.into()))
        }
    }
}
