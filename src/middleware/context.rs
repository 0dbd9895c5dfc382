use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_sessions::Session;

use super::notices::Notices;
use crate::auth::{IdentityProvider, SessionIdentity};
use crate::database::models::{Campground, Review};
use crate::error::ApiError;
use crate::validation::ValidatedPayload;

/// Everything a gate or handler knows about the request in flight.
///
/// Built fresh per request and passed by value through the gate chain; gates
/// attach what they resolve so the handler never looks it up again.
pub struct RequestContext {
    pub session: Session,
    pub current_user: Option<SessionIdentity>,
    /// Path and query as requested, remembered for the post-login redirect
    pub requested_url: String,
    pub campground_id: Option<String>,
    pub review_id: Option<String>,
    pub payload: Option<Value>,
    pub campground: Option<Campground>,
    pub review: Option<Review>,
    pub validated: Option<ValidatedPayload>,
}

impl RequestContext {
    pub fn new(session: Session, current_user: Option<SessionIdentity>, requested_url: impl Into<String>) -> Self {
        Self {
            session,
            current_user,
            requested_url: requested_url.into(),
            campground_id: None,
            review_id: None,
            payload: None,
            campground: None,
            review: None,
            validated: None,
        }
    }

    pub fn with_campground_id(mut self, id: impl Into<String>) -> Self {
        self.campground_id = Some(id.into());
        self
    }

    pub fn with_review_id(mut self, id: impl Into<String>) -> Self {
        self.review_id = Some(id.into());
        self
    }

    pub fn with_payload(mut self, payload: Option<Value>) -> Self {
        self.payload = payload;
        self
    }

    pub fn notices(&self) -> Notices<'_> {
        Notices::new(&self.session)
    }

    /// The acting user. Fails closed if the login gate did not run.
    pub fn user(&self) -> Result<&SessionIdentity, ApiError> {
        self.current_user
            .as_ref()
            .ok_or_else(|| ApiError::unauthorized("Please log in first"))
    }

    /// The campground resolved by the ownership gate
    pub fn take_campground(&mut self) -> Result<Campground, ApiError> {
        self.campground
            .take()
            .ok_or_else(|| ApiError::internal_failure("campground was not resolved by the gate chain"))
    }

    /// The review resolved by the ownership gate
    pub fn take_review(&mut self) -> Result<Review, ApiError> {
        self.review
            .take()
            .ok_or_else(|| ApiError::internal_failure("review was not resolved by the gate chain"))
    }

    /// Typed fields from the validation gate
    pub fn take_validated<T: DeserializeOwned>(&mut self) -> Result<T, ApiError> {
        let validated = self
            .validated
            .take()
            .ok_or_else(|| ApiError::internal_failure("payload was not validated by the gate chain"))?;
        Ok(validated.into_fields()?)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::internal_failure(format!("session layer: {}", msg)))?;

        let current_user = IdentityProvider::current_identity(&session).await?;

        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|OriginalUri(uri)| uri.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let requested_url = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());

        let params = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map(|Path(params)| params)
            .unwrap_or_default();

        let mut ctx = RequestContext::new(session, current_user, requested_url);
        if let Some(id) = params.get("id") {
            ctx = ctx.with_campground_id(id.clone());
        }
        if let Some(id) = params.get("review_id") {
            ctx = ctx.with_review_id(id.clone());
        }
        Ok(ctx)
    }
}
