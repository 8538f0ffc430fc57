//! Section models and DTOs.

use crate::ids::{ClassId, DepartmentKey, OrganizationKey, SectionId};
use chrono::{DateTime, Utc};
use mydesk_core::serde::deserialize_optional_from_str;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub class: ClassId,
    pub class_title: String,
    pub department: DepartmentKey,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSection {
    pub title: String,
    pub class: ClassId,
}

#[derive(Debug, Clone, Default)]
pub struct SectionFilter {
    pub id: Option<SectionId>,
    pub organization: Option<OrganizationKey>,
    pub department: Option<DepartmentKey>,
    pub class: Option<ClassId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SectionListQuery {
    pub org_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub class_id: Option<ClassId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSectionDto {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub class_id: Option<ClassId>,
    #[validate(length(min = 1, max = 100, message = "title must be 1-100 characters"))]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteSectionDto {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub id: Option<SectionId>,
}
