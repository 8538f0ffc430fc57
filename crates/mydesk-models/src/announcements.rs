//! Announcement models and DTOs.
//!
//! An announcement records who it was published as: the organization itself,
//! a department (through one of its classes) or a teacher (through one of
//! their subjects). That provenance is the [`AnnouncementOrigin`], stored as
//! JSONB.

use crate::ids::{
    AnnouncementId, ClassId, DepartmentKey, OrganizationKey, SubjectId, TeacherId, UserId,
};
use chrono::{DateTime, Utc};
use mydesk_core::serde::{
    deserialize_optional_bool_flag, deserialize_optional_datetime, deserialize_optional_from_str,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnouncementOrigin {
    Organization {
        organization: OrganizationKey,
    },
    Department {
        class: ClassId,
        department: DepartmentKey,
    },
    Teacher {
        subject: SubjectId,
        teacher: TeacherId,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Announcement {
    pub id: AnnouncementId,
    /// The author.
    pub user_id: UserId,
    pub organization_id: OrganizationKey,
    pub title: String,
    pub description: Option<String>,
    pub data: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub visible: bool,
    pub origin: AnnouncementOrigin,
    pub is_public: bool,
    pub acknowledge: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub user_id: UserId,
    pub organization_id: OrganizationKey,
    pub title: String,
    pub description: Option<String>,
    pub data: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub visible: bool,
    pub origin: AnnouncementOrigin,
    pub is_public: bool,
    pub acknowledge: bool,
}

/// Fields the author may change.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AnnouncementChanges {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub data: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub date: Option<DateTime<Utc>>,
    pub visible: Option<bool>,
    pub is_public: Option<bool>,
    pub acknowledge: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnnouncementFilter {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    #[param(value_type = Option<i64>)]
    pub id: Option<AnnouncementId>,
    pub org_id: Option<String>,
    /// Inclusive lower bound on `date` (RFC 3339 or `YYYY-MM-DD`).
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    #[param(value_type = Option<String>)]
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `date`.
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    #[param(value_type = Option<String>)]
    pub end_date: Option<DateTime<Utc>>,
    /// Only the literals `true` and `false` filter.
    #[serde(default, deserialize_with = "deserialize_optional_bool_flag")]
    #[param(value_type = Option<bool>)]
    pub is_public: Option<bool>,
    #[serde(skip)]
    pub author: Option<UserId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAnnouncementDto {
    pub org_id: Option<String>,
    #[validate(length(max = 200, message = "title must be at most 200 characters"))]
    pub title: Option<String>,
    /// One of `org`, `dept` or `teacher`.
    pub user_type: Option<String>,
    /// Class id for `dept`, subject id for `teacher`; ignored for `org`.
    pub from: Option<i64>,
    pub description: Option<String>,
    pub data: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub date: Option<DateTime<Utc>>,
    pub visible: Option<bool>,
    pub is_public: Option<bool>,
    pub acknowledge: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAnnouncementDto {
    pub org_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub id: Option<AnnouncementId>,
    #[serde(flatten)]
    #[validate(nested)]
    pub changes: AnnouncementChanges,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteAnnouncementDto {
    pub org_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub id: Option<AnnouncementId>,
}
