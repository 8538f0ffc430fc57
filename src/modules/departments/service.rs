use anyhow::anyhow;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use mydesk_core::{AppError, AppResult};
use mydesk_db::{DEPARTMENT_ID_KEY, JOIN_REQUEST_KEY, Store, StoreError};
use mydesk_models::classes::ClassFilter;
use mydesk_models::departments::NewDepartment;
use mydesk_models::ids::SectionId;
use mydesk_models::students::StudentFilter;

use crate::context::{Pipeline, RequestContext, checks};
use crate::metrics::{track_department_created, track_join_request, track_soft_delete};
use crate::modules::departments::model::{
    ADMIT_STUDENTS_USAGE, AdmitStudentsDto, ApproveJoinRequestDto, Class, CreateDepartmentDto,
    Department, DepartmentFilter, MAX_DEPARTMENT_ID_ATTEMPTS, Student, UpdateDepartmentDto,
};

const REQUEST_ALREADY_SENT: &str = "Request already sent";
const INVALID_STUDENT_ID: &str = "Invalid student ID";

fn generate_department_id() -> String {
    Uuid::new_v4().to_string()
}

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(store))]
    pub async fn get_departments(
        store: &dyn Store,
        ctx: &RequestContext,
        filter: DepartmentFilter,
    ) -> AppResult<Vec<Department>> {
        Pipeline::new().run(store, ctx).await?;

        Ok(store.find_departments(&filter).await?)
    }

    pub async fn create_department(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: CreateDepartmentDto,
    ) -> AppResult<Department> {
        Self::create_department_with(store, ctx, dto, generate_department_id).await
    }

    /// Creates the department under a freshly generated `department_id`,
    /// drawing a new one from `generate` whenever the store reports a
    /// collision.
    #[instrument(skip(store, generate))]
    pub async fn create_department_with<G>(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: CreateDepartmentDto,
        mut generate: G,
    ) -> AppResult<Department>
    where
        G: FnMut() -> String + Send,
    {
        let resolved = Pipeline::new()
            .organization()
            .member()
            .run(store, ctx)
            .await?;
        let organization = resolved.organization()?;

        for attempt in 1..=MAX_DEPARTMENT_ID_ATTEMPTS {
            let new = NewDepartment {
                department_id: generate(),
                name: dto.name.clone(),
                contact_name: dto.contact_name.clone(),
                contact_phone: dto.contact_phone.clone(),
                contact_email: dto.contact_email.clone(),
                organization_id: organization.id,
                requested_by: Some(resolved.user_id()),
            };

            match store.insert_department(new).await {
                Ok(department) => {
                    track_department_created();
                    info!(
                        department_id = %department.department_id,
                        org_id = %organization.org_id,
                        "department created"
                    );
                    return Ok(department);
                }
                Err(err) if err.is_unique_violation_of(DEPARTMENT_ID_KEY) => {
                    warn!(attempt, "department_id collision, regenerating");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(AppError::internal(anyhow!(
            "no unique department_id after {MAX_DEPARTMENT_ID_ATTEMPTS} attempts"
        )))
    }

    #[instrument(skip(store))]
    pub async fn update_department(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: UpdateDepartmentDto,
    ) -> AppResult<Department> {
        let resolved = Pipeline::new()
            .organization()
            .department()
            .department_in_organization()
            .department_or_org_admin()
            .run(store, ctx)
            .await?;
        let department = resolved.department()?;

        store
            .update_department(department.id, &dto.changes)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("invalid dept_id"),
                other => other.into(),
            })
    }

    #[instrument(skip(store))]
    pub async fn delete_department(store: &dyn Store, ctx: &RequestContext) -> AppResult<()> {
        let resolved = Pipeline::new()
            .organization()
            .org_admin()
            .run(store, ctx)
            .await?;
        let dept_id = ctx
            .dept_id
            .as_deref()
            .ok_or_else(|| AppError::missing_parameter("dept_id"))?;
        let department = checks::department_scope(store, resolved.organization()?, dept_id)
            .await?
            .ok_or_else(|| AppError::not_found("invalid id"))?;

        store
            .soft_delete_department(department.id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("invalid id"),
                other => other.into(),
            })?;

        track_soft_delete("department");
        Ok(())
    }

    #[instrument(skip(store))]
    pub async fn verify_department(
        store: &dyn Store,
        dept_id: Option<&str>,
    ) -> AppResult<Department> {
        let dept_id = dept_id.filter(|id| !id.is_empty());
        checks::resolve_department(store, dept_id).await
    }

    #[instrument(skip(store))]
    pub async fn join_department(store: &dyn Store, ctx: &RequestContext) -> AppResult<()> {
        let resolved = Pipeline::new()
            .organization()
            .department()
            .accepting_requests()
            .department_in_organization()
            .run(store, ctx)
            .await?;
        let department = resolved.department()?;
        let user = resolved.user_id();

        if department.owner_id == Some(user) || department.is_requested_by(user) {
            return Err(AppError::conflict(REQUEST_ALREADY_SENT));
        }

        store
            .add_join_request(department.id, user)
            .await
            .map_err(|err| {
                if err.is_unique_violation_of(JOIN_REQUEST_KEY) {
                    return AppError::conflict(REQUEST_ALREADY_SENT);
                }
                AppError::from(err)
            })?;

        track_join_request("department");
        info!(department_id = %department.department_id, user_id = %user, "join request recorded");
        Ok(())
    }

    #[instrument(skip(store))]
    pub async fn approve_join_request(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: ApproveJoinRequestDto,
    ) -> AppResult<Department> {
        let resolved = Pipeline::new()
            .organization()
            .department()
            .department_in_organization()
            .org_admin()
            .run(store, ctx)
            .await?;
        let department = resolved.department()?;
        let user = dto
            .user_id
            .ok_or_else(|| AppError::missing_parameter("user_id"))?;

        if !department.is_requested_by(user) {
            return Err(AppError::not_found("No pending request for this user"));
        }

        store
            .approve_join_request(department.id, user)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("No pending request for this user"),
                other => other.into(),
            })
    }

    #[instrument(skip(store))]
    pub async fn get_assigned_classes(
        store: &dyn Store,
        ctx: &RequestContext,
    ) -> AppResult<Vec<Class>> {
        let resolved = Pipeline::new().department().run(store, ctx).await?;
        let filter = ClassFilter {
            department: Some(resolved.department()?.id),
            ..Default::default()
        };

        Ok(store.find_classes(&filter).await?)
    }

    /// Students waiting for admission to `sec_id`, a section of the
    /// caller's department.
    #[instrument(skip(store))]
    pub async fn get_pending_students(
        store: &dyn Store,
        ctx: &RequestContext,
        sec_id: Option<SectionId>,
    ) -> AppResult<Vec<Student>> {
        let resolved = Pipeline::new()
            .department()
            .department_owner()
            .run(store, ctx)
            .await?;
        let sec_id = sec_id.ok_or_else(|| AppError::missing_parameter("sec_id"))?;

        let filter = StudentFilter {
            requested_section: Some(sec_id),
            requested_department: Some(resolved.department()?.id),
            ..Default::default()
        };
        let students = store.find_students(&filter).await?;
        if students.is_empty() {
            return Err(AppError::invalid(format!(
                "no request pending for this section_id: {sec_id}"
            )));
        }

        Ok(students)
    }

    /// Admits every listed student or none of them.
    #[instrument(skip(store))]
    pub async fn admit_students(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: AdmitStudentsDto,
    ) -> AppResult<Vec<Student>> {
        let resolved = Pipeline::new()
            .organization()
            .department()
            .department_in_organization()
            .department_owner()
            .run(store, ctx)
            .await?;
        let department = resolved.department()?;
        let ids = dto
            .student_ids()
            .ok_or_else(|| AppError::invalid(ADMIT_STUDENTS_USAGE))?;

        for id in &ids {
            let by_id = StudentFilter {
                id: Some(*id),
                ..Default::default()
            };
            let student = store
                .find_student(&by_id)
                .await?
                .ok_or_else(|| AppError::invalid(INVALID_STUDENT_ID))?;

            if !student.has_pending_request() {
                return Err(AppError::invalid("no students in waiting list"));
            }

            let waiting_here = StudentFilter {
                id: Some(*id),
                requested_department: Some(department.id),
                ..Default::default()
            };
            if store.find_student(&waiting_here).await?.is_none() {
                return Err(AppError::invalid(INVALID_STUDENT_ID));
            }
        }

        let admitted = store.admit_students(&ids).await.map_err(|err| match err {
            StoreError::NotFound => AppError::invalid(INVALID_STUDENT_ID),
            other => other.into(),
        })?;

        info!(
            department_id = %department.department_id,
            count = admitted.len(),
            "students admitted"
        );
        Ok(admitted)
    }
}
