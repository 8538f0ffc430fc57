//! Extractors that deserialize and validate request input.
//!
//! Both reject with an [`AppError`] so extraction failures share the
//! `{"details": [...]}` envelope with every other error.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use mydesk_core::{AppError, ErrorKind};

/// Name of the field a serde "missing field" message refers to.
fn missing_field(message: &str) -> Option<&str> {
    message
        .split("missing field `")
        .nth(1)
        .and_then(|rest| rest.split('`').next())
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let error_msg = rejection.body_text();

    if let Some(field) = missing_field(&error_msg) {
        return AppError::new(ErrorKind::MissingParameter, format!("{field} is required"));
    }

    if error_msg.contains("invalid type") || error_msg.contains("invalid value") {
        return AppError::invalid("Invalid field type in request");
    }

    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::invalid("Missing 'Content-Type: application/json' header");
    }

    AppError::invalid("Invalid request body")
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    let error_msg = rejection.body_text();

    if let Some(field) = missing_field(&error_msg) {
        return AppError::new(ErrorKind::MissingParameter, format!("{field} is required"));
    }

    AppError::invalid(error_msg)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;

        value.validate()?;

        Ok(ValidatedQuery(value))
    }
}
