//! Request context resolution.
//!
//! Handlers declare the checks they need as a [`Pipeline`] and run it against
//! the store before touching any data:
//!
//! ```ignore
//! let resolved = Pipeline::new()
//!     .organization()
//!     .department()
//!     .department_in_organization()
//!     .department_or_org_admin()
//!     .run(store, &ctx)
//!     .await?;
//!
//! let department = resolved.department()?;
//! ```
//!
//! Every run first resolves the caller to a live user (`Unauthorized`
//! otherwise). Checks then execute in declared order and the first failure
//! ends the run. Checks only read, so a failed run leaves nothing behind.

pub mod checks;
pub mod role;

use anyhow::anyhow;
use tracing::debug;

use mydesk_core::{AppError, AppResult};
use mydesk_db::Store;
use mydesk_models::departments::Department;
use mydesk_models::ids::UserId;
use mydesk_models::organizations::Organization;
use mydesk_models::users::User;

use crate::metrics::track_context_rejection;

pub use role::UserType;

/// The caller and the scope identifiers supplied with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: UserId,
    pub org_id: Option<String>,
    pub dept_id: Option<String>,
}

impl RequestContext {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            org_id: None,
            dept_id: None,
        }
    }

    /// Empty strings count as absent.
    pub fn with_org_id(mut self, org_id: Option<&str>) -> Self {
        self.org_id = org_id.filter(|id| !id.is_empty()).map(str::to_string);
        self
    }

    /// Empty strings count as absent.
    pub fn with_dept_id(mut self, dept_id: Option<&str>) -> Self {
        self.dept_id = dept_id.filter(|id| !id.is_empty()).map(str::to_string);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// `org_id` → live organization.
    ResolveOrganization,
    /// `dept_id` → live department.
    ResolveDepartment,
    AcceptingRequests,
    DepartmentInOrganization,
    OrganizationMembership,
    OrganizationAdmin,
    DepartmentOrOrgRole,
    DepartmentOwner,
    /// The named publishing role (`org`, `dept` or `teacher`).
    Role(String),
}

/// What a successful pipeline run produced.
#[derive(Debug, Clone)]
pub struct Resolved {
    user: User,
    organization: Option<Organization>,
    department: Option<Department>,
    user_type: Option<UserType>,
}

fn unresolved(what: &str) -> AppError {
    AppError::internal(anyhow!("context pipeline did not resolve the {what}"))
}

impl Resolved {
    fn new(user: User) -> Self {
        Self {
            user,
            organization: None,
            department: None,
            user_type: None,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn organization(&self) -> AppResult<&Organization> {
        self.organization
            .as_ref()
            .ok_or_else(|| unresolved("organization"))
    }

    pub fn department(&self) -> AppResult<&Department> {
        self.department.as_ref().ok_or_else(|| unresolved("department"))
    }

    pub fn user_type(&self) -> AppResult<UserType> {
        self.user_type.ok_or_else(|| unresolved("user type"))
    }
}

impl Check {
    /// Label used in logs and the rejection metric.
    pub fn name(&self) -> &'static str {
        match self {
            Check::ResolveOrganization => "organization",
            Check::ResolveDepartment => "department",
            Check::AcceptingRequests => "accepting_requests",
            Check::DepartmentInOrganization => "department_in_organization",
            Check::OrganizationMembership => "member",
            Check::OrganizationAdmin => "org_admin",
            Check::DepartmentOrOrgRole => "department_or_org_admin",
            Check::DepartmentOwner => "department_owner",
            Check::Role(_) => "role",
        }
    }

    async fn apply(
        &self,
        store: &dyn Store,
        ctx: &RequestContext,
        resolved: &mut Resolved,
    ) -> AppResult<()> {
        let user = resolved.user.id;

        match self {
            Check::ResolveOrganization => {
                let organization =
                    checks::resolve_organization(store, ctx.org_id.as_deref()).await?;
                resolved.organization = Some(organization);
            }
            Check::ResolveDepartment => {
                let department = checks::resolve_department(store, ctx.dept_id.as_deref()).await?;
                resolved.department = Some(department);
            }
            Check::AcceptingRequests => {
                checks::require_accepting_requests(resolved.organization()?)?;
            }
            Check::DepartmentInOrganization => {
                checks::require_department_in_organization(
                    resolved.department()?,
                    resolved.organization()?,
                )?;
            }
            Check::OrganizationMembership => {
                checks::require_organization_membership(store, user, resolved.organization()?)
                    .await?;
            }
            Check::OrganizationAdmin => {
                checks::require_organization_admin(user, resolved.organization()?)?;
            }
            Check::DepartmentOrOrgRole => {
                checks::require_department_or_org_role(store, user, resolved.department()?)
                    .await?;
            }
            Check::DepartmentOwner => {
                checks::require_department_owner(user, resolved.department()?)?;
            }
            Check::Role(role_name) => {
                let (user_type, department) =
                    checks::require_role(store, role_name, resolved.organization()?, user).await?;
                resolved.user_type = Some(user_type);
                if department.is_some() {
                    resolved.department = department;
                }
            }
        }

        Ok(())
    }
}

/// An ordered list of checks, built fluently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    checks: Vec<Check>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn organization(self) -> Self {
        self.then(Check::ResolveOrganization)
    }

    pub fn department(self) -> Self {
        self.then(Check::ResolveDepartment)
    }

    pub fn accepting_requests(self) -> Self {
        self.then(Check::AcceptingRequests)
    }

    pub fn department_in_organization(self) -> Self {
        self.then(Check::DepartmentInOrganization)
    }

    pub fn member(self) -> Self {
        self.then(Check::OrganizationMembership)
    }

    pub fn org_admin(self) -> Self {
        self.then(Check::OrganizationAdmin)
    }

    pub fn department_or_org_admin(self) -> Self {
        self.then(Check::DepartmentOrOrgRole)
    }

    pub fn department_owner(self) -> Self {
        self.then(Check::DepartmentOwner)
    }

    pub fn role(self, role_name: impl Into<String>) -> Self {
        self.then(Check::Role(role_name.into()))
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub async fn run(&self, store: &dyn Store, ctx: &RequestContext) -> AppResult<Resolved> {
        let user = store
            .find_user(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User not found"))?;
        let mut resolved = Resolved::new(user);

        for check in &self.checks {
            if let Err(err) = check.apply(store, ctx, &mut resolved).await {
                debug!(user_id = %ctx.user_id, check = check.name(), error = %err, "context check failed");
                track_context_rejection(check.name());
                return Err(err);
            }
        }

        Ok(resolved)
    }
}
