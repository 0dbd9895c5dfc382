use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;

use super::body_value;
use crate::error::ApiError;
use crate::middleware::gates::RETURN_TO_KEY;
use crate::middleware::{ApiResponse, ApiResult, Notices};
use crate::state::AppState;
use crate::validation::{self, LOGIN};

/// Where a fresh login lands when no protected page was interrupted
pub const DEFAULT_LANDING: &str = "/campgrounds";

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// GET /login - Login form plus any pending notices
pub async fn form(session: Session) -> ApiResult<Value> {
    let notices = Notices::new(&session).drain().await?;
    Ok(ApiResponse::view(
        json!({
            "form": "login",
            "action": "/login",
            "fields": ["username", "password"]
        }),
        notices,
    ))
}

/// POST /login - Authenticate and resume the interrupted page, if any
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    body: Option<Json<Value>>,
) -> ApiResult<Value> {
    let request: LoginRequest = validation::validate(&LOGIN, &body_value(body))?.into_fields()?;

    let identity = match state.identity.authenticate(&request.username, &request.password).await {
        Ok(identity) => identity,
        Err(err @ ApiError::AuthenticationFailed(_)) => {
            Notices::new(&session).error(err.message()).await?;
            return Err(err);
        }
        Err(err) => return Err(err),
    };

    // Read before login() rotates the session id; the data survives the rotation
    let return_to = session.remove::<String>(RETURN_TO_KEY).await?;
    state.identity.login(&session, &identity).await?;
    Notices::new(&session).success("Welcome back!").await?;

    let location = return_to.unwrap_or_else(|| DEFAULT_LANDING.to_string());
    Ok(ApiResponse::redirect(location, json!({ "user": identity })))
}
