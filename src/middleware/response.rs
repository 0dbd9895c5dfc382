use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use super::notices::NoticeQueue;

/// Wrapper for API responses that automatically adds success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
    /// Redirect target for mutations
    pub location: Option<String>,
    /// Drained notices, present on rendered views
    pub notices: Option<NoticeQueue>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None,
            location: None,
            notices: None,
        }
    }

    /// A rendered view carrying the notices drained for this render
    pub fn view(data: T, notices: NoticeQueue) -> Self {
        Self::success(data).with_notices(notices)
    }

    /// 302 to `location`, with the affected resource in the body
    pub fn redirect(location: impl Into<String>, data: T) -> Self {
        Self {
            data,
            status_code: Some(StatusCode::FOUND),
            location: Some(location.into()),
            notices: None,
        }
    }

    pub fn with_notices(mut self, notices: NoticeQueue) -> Self {
        self.notices = Some(notices);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // Convert data to JSON Value for consistent envelope format
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Something went wrong",
                        "code": "INTERNAL_FAILURE"
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = json!({
            "success": true,
            "data": data_value
        });
        if let Some(notices) = &self.notices {
            envelope["notices"] = json!(notices);
        }

        match self.location {
            Some(location) => (status, [(header::LOCATION, location)], Json(envelope)).into_response(),
            None => (status, Json::<Value>(envelope)).into_response(),
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_sets_location_and_status() {
        let response = ApiResponse::redirect("/campgrounds/abc", json!({ "id": "abc" })).into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/campgrounds/abc");
    }

    #[test]
    fn plain_success_is_ok() {
        let response = ApiResponse::success(json!([])).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
    }
}
