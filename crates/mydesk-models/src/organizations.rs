//! Organization models and DTOs.
//!
//! An organization is the tenant boundary. Clients address it by its opaque
//! `org_id` string; the numeric key never leaves the server except in
//! responses.

use crate::ids::{OrganizationKey, UserId};
use chrono::{DateTime, Utc};
use mydesk_core::serde::{deserialize_optional_bool_flag, deserialize_optional_from_str};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Organization {
    pub id: OrganizationKey,
    pub org_id: String,
    pub name: String,
    /// The organization administrator.
    pub owner_id: UserId,
    pub accepting_requests: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub org_id: String,
    pub name: String,
    pub owner_id: UserId,
}

/// Fields an owner may change. Anything else in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct OrganizationChanges {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    pub accepting_requests: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrganizationFilter {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub id: Option<OrganizationKey>,
    pub org_id: Option<String>,
    #[serde(skip)]
    pub owner: Option<UserId>,
    #[serde(default, deserialize_with = "deserialize_optional_bool_flag")]
    #[param(value_type = Option<bool>)]
    pub accepting_requests: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrganizationDto {
    #[validate(length(min = 1, max = 100, message = "org_id must be 1-100 characters"))]
    pub org_id: String,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrganizationDto {
    pub org_id: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub changes: OrganizationChanges,
}

/// Body of requests that only name an organization.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct OrganizationRef {
    pub org_id: Option<String>,
}
