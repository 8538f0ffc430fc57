use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use mydesk_auth::{Claims, verify_token};
use mydesk_core::AppError;
use mydesk_models::ids::UserId;

use crate::context::RequestContext;
use crate::state::AppState;

/// Extractor that validates the bearer JWT and provides the caller's claims.
///
/// A valid token only proves identity; whether the user still exists is
/// checked when the handler's pipeline runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0.user_id().map(UserId::from_uuid)
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    /// A context carrying only the caller; add scope identifiers with
    /// [`RequestContext::with_org_id`] and [`RequestContext::with_dept_id`].
    pub fn context(&self) -> Result<RequestContext, AppError> {
        Ok(RequestContext::new(self.user_id()?))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}
