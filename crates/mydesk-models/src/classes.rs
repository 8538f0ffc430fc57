//! Class models and DTOs.

use crate::ids::{ClassId, DepartmentKey, OrganizationKey};
use chrono::{DateTime, Utc};
use mydesk_core::serde::deserialize_optional_from_str;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A class, serialized with its department's name and external id inlined.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Class {
    pub id: ClassId,
    pub title: String,
    pub department: DepartmentKey,
    pub department_name: String,
    /// The owning department's external `department_id`.
    pub department_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewClass {
    pub title: String,
    pub department: DepartmentKey,
}

#[derive(Debug, Clone, Default)]
pub struct ClassFilter {
    pub id: Option<ClassId>,
    pub organization: Option<OrganizationKey>,
    pub department: Option<DepartmentKey>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassListQuery {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub id: Option<ClassId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateClassDto {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[validate(length(max = 100, message = "title must be at most 100 characters"))]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateClassDto {
    pub org_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub id: Option<ClassId>,
    #[validate(length(min = 1, max = 100, message = "title must be 1-100 characters"))]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteClassDto {
    pub org_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub id: Option<ClassId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_serializes_department_fields() {
        let class = Class {
            id: ClassId(3),
            title: "Grade 7".to_string(),
            department: DepartmentKey(2),
            department_name: "Science".to_string(),
            department_id: "5f0c".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["department_name"], "Science");
        assert_eq!(json["department_id"], "5f0c");
        assert_eq!(json["department"], 2);
    }

    #[test]
    fn test_title_length_is_bounded() {
        let dto = CreateClassDto {
            org_id: None,
            dept_id: None,
            title: Some("x".repeat(101)),
        };
        assert!(dto.validate().is_err());
    }
}
