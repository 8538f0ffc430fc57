//! Teacher models and DTOs.

use crate::ids::{DepartmentKey, OrganizationKey, TeacherId, UserId};
use chrono::{DateTime, Utc};
use mydesk_core::serde::deserialize_optional_from_str;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: TeacherId,
    pub user_id: UserId,
    pub email: String,
    pub department: DepartmentKey,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub user_id: UserId,
    pub department: DepartmentKey,
}

#[derive(Debug, Clone, Default)]
pub struct TeacherFilter {
    pub id: Option<TeacherId>,
    pub organization: Option<OrganizationKey>,
    pub department: Option<DepartmentKey>,
    pub user: Option<UserId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeacherListQuery {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub id: Option<TeacherId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherDto {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteTeacherDto {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub id: Option<TeacherId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_teacher_rejects_non_uuid_user() {
        let result: Result<CreateTeacherDto, _> =
            serde_json::from_value(serde_json::json!({ "user_id": 12 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_list_query_treats_empty_id_as_absent() {
        let query: TeacherListQuery =
            serde_json::from_value(serde_json::json!({ "org_id": "o", "id": "" })).unwrap();
        assert!(query.id.is_none());
    }
}
