// HTTP API Error Types
use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::database::StoreError;
use crate::validation::ValidationError;

/// Where an unauthenticated caller is sent
pub const LOGIN_PATH: &str = "/login";

const GENERIC_MESSAGE: &str = "Something went wrong";

/// Every way a request can be rejected. All gate failures and handler faults
/// end up here and are rendered by the single `IntoResponse` impl below.
#[derive(Debug)]
pub enum ApiError {
    // 401 - bad handle or credential, deliberately indistinguishable
    AuthenticationFailed(String),

    // 302 to the login page - no session identity
    Unauthorized(String),

    // 403 - logged in, not the owner
    Forbidden(String),

    // 404 - target resource missing
    NotFound(String),

    // 400 - payload shape or constraint violation
    ValidationFailed {
        message: String,
        field_errors: Option<BTreeMap<String, String>>,
    },

    // 404 - no route matched
    NotFoundRoute(String),

    // 500 - unexpected store/session fault; the detail is logged, never sent
    InternalFailure(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized(_) => StatusCode::FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFoundRoute(_) => StatusCode::NOT_FOUND,
            ApiError::InternalFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        let msg = match self {
            ApiError::AuthenticationFailed(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::ValidationFailed { message, .. } => message,
            ApiError::NotFoundRoute(msg) => msg,
            ApiError::InternalFailure(_) => return GENERIC_MESSAGE,
        };
        if msg.trim().is_empty() {
            GENERIC_MESSAGE
        } else {
            msg
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::AuthenticationFailed(_) => "AUTHENTICATION_FAILED",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::ValidationFailed { .. } => "VALIDATION_FAILED",
            ApiError::NotFoundRoute(_) => "NOT_FOUND_ROUTE",
            ApiError::InternalFailure(_) => "INTERNAL_FAILURE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code()
        });

        if let ApiError::ValidationFailed { field_errors: Some(field_errors), .. } = self {
            body["field_errors"] = json!(field_errors);
        }

        body
    }
}

// Static constructor methods
impl ApiError {
    pub fn authentication_failed() -> Self {
        ApiError::AuthenticationFailed("Username or password is incorrect".to_string())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn validation_failed(
        message: impl Into<String>,
        field_errors: Option<BTreeMap<String, String>>,
    ) -> Self {
        ApiError::ValidationFailed {
            message: message.into(),
            field_errors,
        }
    }

    pub fn not_found_route(message: impl Into<String>) -> Self {
        ApiError::NotFoundRoute(message.into())
    }

    pub fn internal_failure(detail: impl Into<String>) -> Self {
        ApiError::InternalFailure(detail.into())
    }
}

// Convert other error types to ApiError
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => ApiError::not_found(format!("Cannot find that {}", entity)),
            StoreError::Conflict(msg) => ApiError::validation_failed(msg, None),
            StoreError::Backend(msg) => ApiError::internal_failure(format!("store backend: {}", msg)),
            StoreError::Sqlx(sqlx_err) => ApiError::internal_failure(format!("sqlx: {}", sqlx_err)),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let field_errors = err.field_errors();
        ApiError::validation_failed(err.joined_message(), Some(field_errors))
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        ApiError::internal_failure(format!("session: {}", err))
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Centralized error responder
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        match &self {
            ApiError::InternalFailure(detail) => tracing::error!("Internal failure: {}", detail),
            other => tracing::debug!("Request rejected ({}): {}", other.error_code(), other.message()),
        }

        let body = Json(self.to_json());
        if let ApiError::Unauthorized(_) = self {
            return (status, [(header::LOCATION, LOGIN_PATH)], body).into_response();
        }
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(ApiError::authentication_failed().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::unauthorized("x").status_code(), StatusCode::FOUND);
        assert_eq!(ApiError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::validation_failed("x", None).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found_route("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::internal_failure("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_detail_never_reaches_client() {
        let err = ApiError::internal_failure("connection refused on 10.0.0.5:5432");
        let body = err.to_json();
        assert_eq!(body["error"], GENERIC_MESSAGE);
        assert!(!body.to_string().contains("10.0.0.5"));
    }

    #[test]
    fn empty_message_falls_back_to_generic() {
        let err = ApiError::forbidden("");
        assert_eq!(err.message(), GENERIC_MESSAGE);
    }

    #[test]
    fn store_not_found_maps_to_not_found() {
        let err: ApiError = StoreError::campground_not_found("abc").into();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.message(), "Cannot find that campground");
    }

    #[test]
    fn store_backend_maps_to_internal() {
        let err: ApiError = StoreError::Backend("disk full".to_string()).into();
        assert!(matches!(err, ApiError::InternalFailure(_)));
    }

    #[test]
    fn unauthorized_redirects_to_login() {
        let response = ApiError::unauthorized("Please log in").into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);
    }

    #[test]
    fn validation_json_carries_field_errors() {
        let mut fields = BTreeMap::new();
        fields.insert("price".to_string(), "must be at least 0".to_string());
        let body = ApiError::validation_failed("\"price\" must be at least 0", Some(fields)).to_json();
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["field_errors"]["price"], "must be at least 0");
    }
}
