use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;

use super::body_value;
use crate::auth::format::{validate_email_format, validate_username_format};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Notices};
use crate::state::AppState;
use crate::validation::{self, REGISTRATION};

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    username: String,
    email: Option<String>,
    password: String,
}

/// GET /register - Registration form description
pub async fn form(session: Session) -> ApiResult<Value> {
    let notices = Notices::new(&session).drain().await?;
    Ok(ApiResponse::view(
        json!({
            "form": "register",
            "action": "/register",
            "fields": ["username", "email", "password"]
        }),
        notices,
    ))
}

/// POST /register - Create an account and log it in
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    body: Option<Json<Value>>,
) -> ApiResult<Value> {
    let request: RegisterRequest = validation::validate(&REGISTRATION, &body_value(body))?.into_fields()?;

    validate_username_format(&request.username)
        .map_err(|msg| ApiError::validation_failed(msg, None))?;
    if let Some(email) = &request.email {
        validate_email_format(email).map_err(|msg| ApiError::validation_failed(msg, None))?;
    }

    let identity = state
        .identity
        .register(&request.username, request.email, &request.password)
        .await?;
    state.identity.login(&session, &identity).await?;
    Notices::new(&session)
        .success(format!("Welcome, {}!", identity.username))
        .await?;

    Ok(ApiResponse::redirect("/campgrounds", json!({ "user": identity })))
}
