//! The `{"details": [...]}` response envelope.
//!
//! Errors always use it; success responses use it for status messages and
//! for the resources whose create/list endpoints historically answered
//! inside the envelope (classes, announcements).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Details<T> {
    pub details: Vec<T>,
}

impl<T> Details<T> {
    pub fn new(details: Vec<T>) -> Self {
        Self { details }
    }

    pub fn single(item: T) -> Self {
        Self {
            details: vec![item],
        }
    }
}

impl Details<String> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::single(message.into())
    }
}

impl<T: Serialize> IntoResponse for Details<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Schema of a message-only envelope, used by the API documentation.
#[derive(Debug, Serialize, ToSchema)]
pub struct DetailsResponse {
    /// Human-readable messages
    pub details: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_envelope_shape() {
        let json = serde_json::to_value(Details::message("Join request sent")).unwrap();
        assert_eq!(json, serde_json::json!({ "details": ["Join request sent"] }));
    }

    #[test]
    fn test_single_wraps_object() {
        let json = serde_json::to_value(Details::single(serde_json::json!({ "id": 1 }))).unwrap();
        assert_eq!(json["details"][0]["id"], 1);
    }
}
