//! Application error type shared by every layer.
//!
//! Each failure carries an [`ErrorKind`] that maps deterministically to one
//! HTTP status, plus the list of human-readable messages returned to the
//! client inside the `{"details": [...]}` envelope.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::ValidationErrors;

use crate::envelope::Details;

/// Message returned to clients for any unexpected fault.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required identifier or field was not supplied.
    MissingParameter,
    /// A supplied value is malformed or inconsistent with the caller.
    Invalid,
    /// No usable credentials, or the token refers to an unknown user.
    Unauthorized,
    /// The entity resolved but the caller lacks the required relationship.
    Forbidden,
    /// The identifier does not resolve to a live entity.
    NotFound,
    /// A uniqueness rule would be violated.
    Conflict,
    /// Unexpected storage or runtime fault.
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::MissingParameter | ErrorKind::Invalid => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub details: Vec<String>,
    pub source: Option<anyhow::Error>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            details: vec![message.into()],
            source: None,
        }
    }

    pub fn with_details(kind: ErrorKind, details: Vec<String>) -> Self {
        Self {
            kind,
            details,
            source: None,
        }
    }

    /// `"<name> is not passed"`, the wording used for every absent identifier.
    pub fn missing_parameter(name: &str) -> Self {
        Self::new(ErrorKind::MissingParameter, format!("{name} is not passed"))
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self {
            kind: ErrorKind::Internal,
            details: vec![INTERNAL_ERROR_MESSAGE.to_string()],
            source: Some(err.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// First message, or an empty string when the error carries none.
    pub fn message(&self) -> &str {
        self.details.first().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.details.join("; "))?;
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(source) = &self.source {
            tracing::error!(error = ?source, "request failed with internal error");
        }

        (self.status(), Json(Details::new(self.details))).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::with_details(ErrorKind::Invalid, format_validation_errors(&errors))
    }
}

/// Flattens validator output into one message per failing rule.
pub fn format_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
            })
        })
        .collect();
    messages.sort();
    messages
}
