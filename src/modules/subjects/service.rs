use tracing::{info, instrument};

use mydesk_core::{AppError, AppResult};
use mydesk_db::{Store, StoreError};
use mydesk_models::sections::SectionFilter;
use mydesk_models::subjects::NewSubject;
use mydesk_models::teachers::TeacherFilter;

use crate::context::{Pipeline, RequestContext};
use crate::metrics::track_soft_delete;
use crate::modules::subjects::model::{
    CreateSubjectDto, DeleteSubjectDto, Subject, SubjectFilter, SubjectListQuery,
};

pub struct SubjectService;

impl SubjectService {
    #[instrument(skip(store))]
    pub async fn get_subjects(
        store: &dyn Store,
        ctx: &RequestContext,
        query: SubjectListQuery,
    ) -> AppResult<Vec<Subject>> {
        let resolved = Pipeline::new()
            .organization()
            .member()
            .run(store, ctx)
            .await?;

        let filter = SubjectFilter {
            organization: Some(resolved.organization()?.id),
            section: query.section_id,
            teacher: query.teacher_id,
            ..Default::default()
        };

        Ok(store.find_subjects(&filter).await?)
    }

    /// The section, and the teacher when one is named, must both belong to
    /// the resolved department.
    #[instrument(skip(store))]
    pub async fn create_subject(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: CreateSubjectDto,
    ) -> AppResult<Subject> {
        let resolved = Pipeline::new()
            .organization()
            .department()
            .department_in_organization()
            .department_or_org_admin()
            .run(store, ctx)
            .await?;
        let department = resolved.department()?;
        let section_id = dto
            .section_id
            .ok_or_else(|| AppError::missing_parameter("section_id"))?;
        if dto.title.trim().is_empty() {
            return Err(AppError::missing_parameter("title"));
        }

        let section = SectionFilter {
            id: Some(section_id),
            department: Some(department.id),
            ..Default::default()
        };
        let section = store
            .find_section(&section)
            .await?
            .ok_or_else(|| AppError::not_found("invalid section_id"))?;

        let teacher = match dto.teacher_id {
            Some(teacher_id) => {
                let teacher = TeacherFilter {
                    id: Some(teacher_id),
                    department: Some(department.id),
                    ..Default::default()
                };
                let teacher = store
                    .find_teacher(&teacher)
                    .await?
                    .ok_or_else(|| AppError::not_found("invalid teacher_id"))?;
                Some(teacher.id)
            }
            None => None,
        };

        let subject = store
            .insert_subject(NewSubject {
                title: dto.title,
                section: section.id,
                teacher,
            })
            .await?;

        info!(subject_id = %subject.id, section_id = %section.id, "subject created");
        Ok(subject)
    }

    #[instrument(skip(store))]
    pub async fn delete_subject(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: DeleteSubjectDto,
    ) -> AppResult<()> {
        let resolved = Pipeline::new()
            .organization()
            .department()
            .department_in_organization()
            .department_or_org_admin()
            .run(store, ctx)
            .await?;
        let id = dto.id.ok_or_else(|| AppError::missing_parameter("id"))?;

        let scoped = SubjectFilter {
            id: Some(id),
            department: Some(resolved.department()?.id),
            ..Default::default()
        };
        let subject = store
            .find_subject(&scoped)
            .await?
            .ok_or_else(|| AppError::not_found("invalid id"))?;

        store
            .soft_delete_subject(subject.id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("invalid id"),
                other => other.into(),
            })?;

        track_soft_delete("subject");
        Ok(())
    }
}
