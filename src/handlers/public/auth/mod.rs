pub mod login;
pub mod logout;
pub mod register;

use axum::Json;
use serde_json::Value;

/// Unwrap an optional JSON body, tolerating a missing or malformed one
pub(crate) fn body_value(body: Option<Json<Value>>) -> Value {
    body.map(|Json(value)| value).unwrap_or(Value::Null)
}
