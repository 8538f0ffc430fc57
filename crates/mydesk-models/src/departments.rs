//! Department models and DTOs.
//!
//! Departments belong to exactly one organization and are addressed by a
//! server-generated `department_id` (a UUID v4 string). Users ask to join a
//! department through a pending request that the organization administrator
//! approves, which makes the requester the department owner.

use crate::ids::{DepartmentKey, OrganizationKey, SectionId, StudentId, UserId};
use crate::users::UserSummary;
use chrono::{DateTime, Utc};
use mydesk_core::serde::deserialize_optional_from_str;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Department {
    pub id: DepartmentKey,
    pub department_id: String,
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub organization_id: OrganizationKey,
    /// The department administrator, once a join request has been approved.
    pub owner_id: Option<UserId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Users with a pending join request.
    #[sqlx(skip)]
    pub requesting_users: Vec<UserSummary>,
}

impl Department {
    pub fn is_requested_by(&self, user: UserId) -> bool {
        self.requesting_users.iter().any(|u| u.id == user)
    }
}

#[derive(Debug, Clone)]
pub struct NewDepartment {
    pub department_id: String,
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub organization_id: OrganizationKey,
    /// Recorded as the first pending join request.
    pub requested_by: Option<UserId>,
}

/// Fields a department owner or organization administrator may change.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct DepartmentChanges {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100, message = "contact_name must be at most 100 characters"))]
    pub contact_name: Option<String>,
    #[validate(length(max = 32, message = "contact_phone must be at most 32 characters"))]
    pub contact_phone: Option<String>,
    #[validate(email(message = "contact_email is invalid"))]
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DepartmentFilter {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub id: Option<DepartmentKey>,
    #[serde(rename = "dept_id")]
    pub department_id: Option<String>,
    pub org_id: Option<String>,
    #[serde(skip)]
    pub organization: Option<OrganizationKey>,
    #[serde(skip)]
    pub owner: Option<UserId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentDto {
    pub org_id: Option<String>,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 100, message = "contact_name must be at most 100 characters"))]
    pub contact_name: Option<String>,
    #[validate(length(max = 32, message = "contact_phone must be at most 32 characters"))]
    pub contact_phone: Option<String>,
    #[validate(email(message = "contact_email is invalid"))]
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartmentDto {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub changes: DepartmentChanges,
}

/// Body of requests that name an organization and one of its departments.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct DepartmentRef {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ApproveJoinRequestDto {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DepartmentQuery {
    pub dept_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PendingStudentsQuery {
    pub dept_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub sec_id: Option<SectionId>,
}

/// Bulk admission of students waiting for a section of the department.
///
/// `students` is kept loosely typed so a malformed list reaches the handler
/// and gets the usage message instead of a body rejection.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AdmitStudentsDto {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[schema(value_type = Option<Vec<i64>>)]
    pub students: Option<serde_json::Value>,
}

impl AdmitStudentsDto {
    /// The listed ids, or `None` unless `students` is a non-empty array of
    /// integers.
    pub fn student_ids(&self) -> Option<Vec<StudentId>> {
        let ids = self
            .students
            .as_ref()?
            .as_array()?
            .iter()
            .map(|value| value.as_i64().map(StudentId))
            .collect::<Option<Vec<_>>>()?;
        (!ids.is_empty()).then_some(ids)
    }
}
