use tracing::{info, instrument};

use mydesk_core::{AppError, AppResult};
use mydesk_db::{Store, StoreError};
use mydesk_models::classes::ClassFilter;
use mydesk_models::sections::NewSection;

use crate::context::{Pipeline, RequestContext};
use crate::metrics::track_soft_delete;
use crate::modules::sections::model::{
    CreateSectionDto, DeleteSectionDto, Section, SectionFilter, SectionListQuery,
};

pub struct SectionService;

impl SectionService {
    #[instrument(skip(store))]
    pub async fn get_sections(
        store: &dyn Store,
        ctx: &RequestContext,
        query: SectionListQuery,
    ) -> AppResult<Vec<Section>> {
        let resolved = Pipeline::new()
            .organization()
            .member()
            .run(store, ctx)
            .await?;

        let filter = SectionFilter {
            organization: Some(resolved.organization()?.id),
            class: query.class_id,
            ..Default::default()
        };

        Ok(store.find_sections(&filter).await?)
    }

    #[instrument(skip(store))]
    pub async fn create_section(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: CreateSectionDto,
    ) -> AppResult<Section> {
        let resolved = Pipeline::new()
            .organization()
            .department()
            .department_in_organization()
            .department_or_org_admin()
            .run(store, ctx)
            .await?;
        let department = resolved.department()?;
        let class_id = dto
            .class_id
            .ok_or_else(|| AppError::missing_parameter("class_id"))?;
        if dto.title.trim().is_empty() {
            return Err(AppError::missing_parameter("title"));
        }

        let in_department = ClassFilter {
            id: Some(class_id),
            department: Some(department.id),
            ..Default::default()
        };
        let class = store
            .find_class(&in_department)
            .await?
            .ok_or_else(|| AppError::not_found("invalid class_id"))?;

        let section = store
            .insert_section(NewSection {
                title: dto.title,
                class: class.id,
            })
            .await?;

        info!(section_id = %section.id, class_id = %class.id, "section created");
        Ok(section)
    }

    #[instrument(skip(store))]
    pub async fn delete_section(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: DeleteSectionDto,
    ) -> AppResult<()> {
        let resolved = Pipeline::new()
            .organization()
            .department()
            .department_in_organization()
            .department_or_org_admin()
            .run(store, ctx)
            .await?;
        let id = dto.id.ok_or_else(|| AppError::missing_parameter("id"))?;

        let scoped = SectionFilter {
            id: Some(id),
            department: Some(resolved.department()?.id),
            ..Default::default()
        };
        let section = store
            .find_section(&scoped)
            .await?
            .ok_or_else(|| AppError::not_found("invalid id"))?;

        store
            .soft_delete_section(section.id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("invalid id"),
                other => other.into(),
            })?;

        track_soft_delete("section");
        Ok(())
    }
}
