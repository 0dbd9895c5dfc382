use axum::extract::State;
use serde_json::{json, Value};
use tower_sessions::Session;

use super::login::DEFAULT_LANDING;
use crate::middleware::{ApiResponse, ApiResult, Notices};
use crate::state::AppState;

/// GET /logout - Drop the session identity
pub async fn get(State(state): State<AppState>, session: Session) -> ApiResult<Value> {
    let previous = state.identity.logout(&session).await?;
    Notices::new(&session).success("Goodbye!").await?;
    Ok(ApiResponse::redirect(
        DEFAULT_LANDING,
        json!({ "logged_out": previous.is_some() }),
    ))
}
