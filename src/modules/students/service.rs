use tracing::{info, instrument};

use mydesk_core::{AppError, AppResult};
use mydesk_db::{Store, StoreError};
use mydesk_models::sections::SectionFilter;

use crate::context::{Pipeline, RequestContext, checks};
use crate::metrics::{track_join_request, track_soft_delete};
use crate::modules::students::model::{
    DeleteStudentDto, JoinSectionDto, Student, StudentFilter, StudentListQuery,
};

pub struct StudentService;

impl StudentService {
    /// Admitted students of the organization.
    #[instrument(skip(store))]
    pub async fn get_students(
        store: &dyn Store,
        ctx: &RequestContext,
        query: StudentListQuery,
    ) -> AppResult<Vec<Student>> {
        let resolved = Pipeline::new()
            .organization()
            .member()
            .run(store, ctx)
            .await?;
        let organization = resolved.organization()?;

        let mut filter = StudentFilter {
            organization: Some(organization.id),
            section: query.sec_id,
            ..Default::default()
        };
        if let Some(dept_id) = query.dept_id.as_deref().filter(|id| !id.is_empty()) {
            match checks::department_scope(store, organization, dept_id).await? {
                Some(department) => filter.department = Some(department.id),
                None => return Ok(Vec::new()),
            }
        }

        Ok(store.find_students(&filter).await?)
    }

    #[instrument(skip(store))]
    pub async fn join_section(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: JoinSectionDto,
    ) -> AppResult<Student> {
        let resolved = Pipeline::new()
            .organization()
            .accepting_requests()
            .run(store, ctx)
            .await?;
        let sec_id = dto
            .sec_id
            .ok_or_else(|| AppError::missing_parameter("sec_id"))?;
        let user = resolved.user_id();

        let in_organization = SectionFilter {
            id: Some(sec_id),
            organization: Some(resolved.organization()?.id),
            ..Default::default()
        };
        let section = store
            .find_section(&in_organization)
            .await?
            .ok_or_else(|| AppError::not_found("invalid sec_id"))?;

        let mine = StudentFilter {
            user: Some(user),
            ..Default::default()
        };
        if let Some(student) = store.find_student(&mine).await? {
            if student.requested_section == Some(section.id) {
                return Err(AppError::conflict("Request already sent"));
            }
            if student.section == Some(section.id) {
                return Err(AppError::conflict("Already a student of this section"));
            }
        }

        let student = store.request_section(user, section.id).await?;

        track_join_request("section");
        info!(student_id = %student.id, section_id = %section.id, "section join requested");
        Ok(student)
    }

    #[instrument(skip(store))]
    pub async fn delete_student(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: DeleteStudentDto,
    ) -> AppResult<()> {
        let resolved = Pipeline::new()
            .organization()
            .department()
            .department_in_organization()
            .department_or_org_admin()
            .run(store, ctx)
            .await?;
        let department = resolved.department()?;
        let id = dto.id.ok_or_else(|| AppError::missing_parameter("id"))?;

        let admitted = StudentFilter {
            id: Some(id),
            department: Some(department.id),
            ..Default::default()
        };
        let waiting = StudentFilter {
            id: Some(id),
            requested_department: Some(department.id),
            ..Default::default()
        };
        let student = match store.find_student(&admitted).await? {
            Some(student) => student,
            None => store
                .find_student(&waiting)
                .await?
                .ok_or_else(|| AppError::not_found("invalid id"))?,
        };

        store
            .soft_delete_student(student.id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("invalid id"),
                other => other.into(),
            })?;

        track_soft_delete("student");
        Ok(())
    }
}
