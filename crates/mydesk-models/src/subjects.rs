//! Subject models and DTOs.

use crate::ids::{DepartmentKey, OrganizationKey, SectionId, SubjectId, TeacherId};
use chrono::{DateTime, Utc};
use mydesk_core::serde::deserialize_optional_from_str;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: SubjectId,
    pub title: String,
    pub section: SectionId,
    pub teacher: Option<TeacherId>,
    pub department: DepartmentKey,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubject {
    pub title: String,
    pub section: SectionId,
    pub teacher: Option<TeacherId>,
}

#[derive(Debug, Clone, Default)]
pub struct SubjectFilter {
    pub id: Option<SubjectId>,
    pub organization: Option<OrganizationKey>,
    pub department: Option<DepartmentKey>,
    pub section: Option<SectionId>,
    pub teacher: Option<TeacherId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubjectListQuery {
    pub org_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub section_id: Option<SectionId>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub teacher_id: Option<TeacherId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubjectDto {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub section_id: Option<SectionId>,
    #[validate(length(min = 1, max = 100, message = "title must be 1-100 characters"))]
    pub title: String,
    #[schema(value_type = Option<i64>)]
    pub teacher_id: Option<TeacherId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteSubjectDto {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub id: Option<SubjectId>,
}
