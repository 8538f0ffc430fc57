//! Student models and DTOs.
//!
//! A user becomes a student by asking to join a section; the request stays in
//! `requested_section` until the department owner admits it, at which point it
//! moves to `section`.

use crate::ids::{DepartmentKey, OrganizationKey, SectionId, StudentId, UserId};
use chrono::{DateTime, Utc};
use mydesk_core::serde::deserialize_optional_from_str;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub user_id: UserId,
    pub email: String,
    /// The admitted section.
    pub section: Option<SectionId>,
    /// A pending admission request.
    pub requested_section: Option<SectionId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn has_pending_request(&self) -> bool {
        self.requested_section.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub id: Option<StudentId>,
    pub user: Option<UserId>,
    pub organization: Option<OrganizationKey>,
    /// Matches the department of the admitted section.
    pub department: Option<DepartmentKey>,
    pub section: Option<SectionId>,
    pub requested_section: Option<SectionId>,
    /// Matches the department of the requested section.
    pub requested_department: Option<DepartmentKey>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentListQuery {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub sec_id: Option<SectionId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct JoinSectionDto {
    pub org_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub sec_id: Option<SectionId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteStudentDto {
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub id: Option<StudentId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_request() {
        let mut student = Student {
            id: StudentId(1),
            user_id: UserId::new(),
            email: "s@school.test".to_string(),
            section: None,
            requested_section: Some(SectionId(4)),
            is_active: true,
            created_at: Utc::now(),
        };
        assert!(student.has_pending_request());
        student.section = student.requested_section.take();
        assert!(!student.has_pending_request());
        assert_eq!(student.section, Some(SectionId(4)));
    }
}
