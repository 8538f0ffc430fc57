//! The individual resolvers and authorization predicates a [`Pipeline`] runs.
//!
//! Resolvers turn a client-supplied identifier into a live entity; predicates
//! decide whether the caller stands in the required relationship to it. None
//! of them write to the store.
//!
//! [`Pipeline`]: super::Pipeline

use mydesk_core::{AppError, AppResult};
use mydesk_db::Store;
use mydesk_models::departments::{Department, DepartmentFilter};
use mydesk_models::ids::UserId;
use mydesk_models::organizations::{Organization, OrganizationFilter};
use mydesk_models::teachers::TeacherFilter;

use super::role::{INVALID_USER_TYPE, UserType};

pub const NOT_A_MEMBER: &str = "You are not a member of this organization";
pub const NOT_ORGANIZATION_ADMIN: &str = "Only the organization owner can perform this action";
pub const NOT_DEPARTMENT_OR_ORGANIZATION_ADMIN: &str =
    "Only the department or organization owner can perform this action";
pub const NOT_DEPARTMENT_OWNER: &str = "Only the department owner can perform this action";
pub const NOT_ACCEPTING_REQUESTS: &str = "This organization is not accepting requests currently.";

pub async fn resolve_organization(
    store: &dyn Store,
    org_id: Option<&str>,
) -> AppResult<Organization> {
    let org_id = org_id.ok_or_else(|| AppError::missing_parameter("org_id"))?;
    let filter = OrganizationFilter {
        org_id: Some(org_id.to_string()),
        ..Default::default()
    };

    store
        .find_organization(&filter)
        .await?
        .ok_or_else(|| AppError::not_found("invalid org_id"))
}

pub async fn resolve_department(store: &dyn Store, dept_id: Option<&str>) -> AppResult<Department> {
    let dept_id = dept_id.ok_or_else(|| AppError::missing_parameter("dept_id"))?;
    let filter = DepartmentFilter {
        department_id: Some(dept_id.to_string()),
        ..Default::default()
    };

    store
        .find_department(&filter)
        .await?
        .ok_or_else(|| AppError::not_found("invalid dept_id"))
}

/// Narrows a listing to one department of `organization`. `Ok(None)` when
/// `dept_id` names no live department there, which callers answer with an
/// empty list rather than an error.
pub async fn department_scope(
    store: &dyn Store,
    organization: &Organization,
    dept_id: &str,
) -> AppResult<Option<Department>> {
    let filter = DepartmentFilter {
        department_id: Some(dept_id.to_string()),
        organization: Some(organization.id),
        ..Default::default()
    };

    Ok(store.find_department(&filter).await?)
}

pub fn require_accepting_requests(organization: &Organization) -> AppResult<()> {
    if organization.accepting_requests {
        Ok(())
    } else {
        Err(AppError::invalid(NOT_ACCEPTING_REQUESTS))
    }
}

pub fn require_department_in_organization(
    department: &Department,
    organization: &Organization,
) -> AppResult<()> {
    if department.organization_id == organization.id {
        Ok(())
    } else {
        Err(AppError::not_found("Invalid dept_id"))
    }
}

/// Owner of the organization, owner of one of its live departments, or a
/// live teacher in one of its live departments.
pub async fn require_organization_membership(
    store: &dyn Store,
    user: UserId,
    organization: &Organization,
) -> AppResult<()> {
    if organization.owner_id == user {
        return Ok(());
    }

    let owned = DepartmentFilter {
        organization: Some(organization.id),
        owner: Some(user),
        ..Default::default()
    };
    if store.find_department(&owned).await?.is_some() {
        return Ok(());
    }

    let teaching = TeacherFilter {
        organization: Some(organization.id),
        user: Some(user),
        ..Default::default()
    };
    if store.find_teacher(&teaching).await?.is_some() {
        return Ok(());
    }

    Err(AppError::forbidden(NOT_A_MEMBER))
}

pub fn require_organization_admin(user: UserId, organization: &Organization) -> AppResult<()> {
    if organization.owner_id == user {
        Ok(())
    } else {
        Err(AppError::forbidden(NOT_ORGANIZATION_ADMIN))
    }
}

/// The caller owns `department`, or owns the organization `department`
/// actually belongs to (which need not be the one named in the request).
pub async fn require_department_or_org_role(
    store: &dyn Store,
    user: UserId,
    department: &Department,
) -> AppResult<()> {
    if department.owner_id == Some(user) {
        return Ok(());
    }

    let parent = OrganizationFilter {
        id: Some(department.organization_id),
        owner: Some(user),
        ..Default::default()
    };
    if store.find_organization(&parent).await?.is_some() {
        return Ok(());
    }

    Err(AppError::forbidden(NOT_DEPARTMENT_OR_ORGANIZATION_ADMIN))
}

pub fn require_department_owner(user: UserId, department: &Department) -> AppResult<()> {
    if department.owner_id == Some(user) {
        Ok(())
    } else {
        Err(AppError::forbidden(NOT_DEPARTMENT_OWNER))
    }
}

/// Parses `role_name` and confirms the caller holds that role in
/// `organization`. A department role yields the one department the caller
/// owns there.
pub async fn require_role(
    store: &dyn Store,
    role_name: &str,
    organization: &Organization,
    user: UserId,
) -> AppResult<(UserType, Option<Department>)> {
    let user_type: UserType = role_name
        .parse()
        .map_err(|_| AppError::invalid(INVALID_USER_TYPE))?;

    match user_type {
        UserType::Organization if organization.owner_id == user => Ok((user_type, None)),
        UserType::Department => {
            let owned = DepartmentFilter {
                organization: Some(organization.id),
                owner: Some(user),
                ..Default::default()
            };
            let mut departments = store.find_departments(&owned).await?;
            if departments.len() == 1 {
                Ok((user_type, departments.pop()))
            } else {
                Err(AppError::invalid(INVALID_USER_TYPE))
            }
        }
        UserType::Teacher => {
            let teaching = TeacherFilter {
                organization: Some(organization.id),
                user: Some(user),
                ..Default::default()
            };
            if store.find_teacher(&teaching).await?.is_some() {
                Ok((user_type, None))
            } else {
                Err(AppError::invalid(INVALID_USER_TYPE))
            }
        }
        UserType::Organization => Err(AppError::invalid(INVALID_USER_TYPE)),
    }
}
