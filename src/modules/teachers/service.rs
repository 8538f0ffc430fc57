use tracing::{info, instrument};

use mydesk_core::{AppError, AppResult};
use mydesk_db::{Store, StoreError, TEACHER_KEY};
use mydesk_models::teachers::NewTeacher;

use crate::context::{Pipeline, RequestContext, checks};
use crate::metrics::track_soft_delete;
use crate::modules::teachers::model::{
    CreateTeacherDto, DeleteTeacherDto, Teacher, TeacherFilter, TeacherListQuery,
};

const TEACHER_EXISTS: &str = "Teacher already exists";

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(store))]
    pub async fn get_teachers(
        store: &dyn Store,
        ctx: &RequestContext,
        query: TeacherListQuery,
    ) -> AppResult<Vec<Teacher>> {
        let resolved = Pipeline::new()
            .organization()
            .member()
            .run(store, ctx)
            .await?;
        let organization = resolved.organization()?;

        let mut filter = TeacherFilter {
            id: query.id,
            organization: Some(organization.id),
            ..Default::default()
        };
        if let Some(dept_id) = query.dept_id.as_deref().filter(|id| !id.is_empty()) {
            match checks::department_scope(store, organization, dept_id).await? {
                Some(department) => filter.department = Some(department.id),
                None => return Ok(Vec::new()),
            }
        }

        Ok(store.find_teachers(&filter).await?)
    }

    #[instrument(skip(store))]
    pub async fn create_teacher(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: CreateTeacherDto,
    ) -> AppResult<Teacher> {
        let resolved = Pipeline::new()
            .organization()
            .department()
            .department_in_organization()
            .department_or_org_admin()
            .run(store, ctx)
            .await?;
        let department = resolved.department()?;
        let user_id = dto
            .user_id
            .ok_or_else(|| AppError::missing_parameter("user_id"))?;

        store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("invalid user_id"))?;

        let existing = TeacherFilter {
            department: Some(department.id),
            user: Some(user_id),
            ..Default::default()
        };
        if store.find_teacher(&existing).await?.is_some() {
            return Err(AppError::conflict(TEACHER_EXISTS));
        }

        let teacher = store
            .insert_teacher(NewTeacher {
                user_id,
                department: department.id,
            })
            .await
            .map_err(|err| {
                if err.is_unique_violation_of(TEACHER_KEY) {
                    return AppError::conflict(TEACHER_EXISTS);
                }
                AppError::from(err)
            })?;

        info!(teacher_id = %teacher.id, department_id = %department.department_id, "teacher added");
        Ok(teacher)
    }

    #[instrument(skip(store))]
    pub async fn delete_teacher(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: DeleteTeacherDto,
    ) -> AppResult<()> {
        let resolved = Pipeline::new()
            .organization()
            .department()
            .department_in_organization()
            .department_or_org_admin()
            .run(store, ctx)
            .await?;
        let id = dto.id.ok_or_else(|| AppError::missing_parameter("id"))?;

        let scoped = TeacherFilter {
            id: Some(id),
            department: Some(resolved.department()?.id),
            ..Default::default()
        };
        let teacher = store
            .find_teacher(&scoped)
            .await?
            .ok_or_else(|| AppError::not_found("invalid id"))?;

        store
            .soft_delete_teacher(teacher.id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("invalid id"),
                other => other.into(),
            })?;

        track_soft_delete("teacher");
        Ok(())
    }
}
