use tracing::{info, instrument};

use mydesk_core::{AppError, AppResult};
use mydesk_db::{CLASS_TITLE_KEY, Store, StoreError};
use mydesk_models::classes::NewClass;

use crate::context::{Pipeline, RequestContext, checks};
use crate::metrics::track_soft_delete;
use crate::modules::classes::model::{
    Class, ClassFilter, ClassListQuery, CreateClassDto, DeleteClassDto, UpdateClassDto,
};

const CLASS_EXISTS: &str = "Class already exists";

fn class_exists(err: StoreError) -> AppError {
    if err.is_unique_violation_of(CLASS_TITLE_KEY) {
        return AppError::conflict(CLASS_EXISTS);
    }
    AppError::from(err)
}

fn required_title(title: Option<String>) -> AppResult<String> {
    title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::missing_parameter("title"))
}

pub struct ClassService;

impl ClassService {
    #[instrument(skip(store))]
    pub async fn get_classes(
        store: &dyn Store,
        ctx: &RequestContext,
        query: ClassListQuery,
    ) -> AppResult<Vec<Class>> {
        let resolved = Pipeline::new()
            .organization()
            .member()
            .run(store, ctx)
            .await?;
        let organization = resolved.organization()?;

        let mut filter = ClassFilter {
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

        Ok(store.find_classes(&filter).await?)
    }

    #[instrument(skip(store))]
    pub async fn create_class(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: CreateClassDto,
    ) -> AppResult<Class> {
        let resolved = Pipeline::new()
            .organization()
            .department()
            .department_in_organization()
            .department_or_org_admin()
            .run(store, ctx)
            .await?;
        let department = resolved.department()?;
        let title = required_title(dto.title)?;

        let duplicate = ClassFilter {
            department: Some(department.id),
            title: Some(title.clone()),
            ..Default::default()
        };
        if store.find_class(&duplicate).await?.is_some() {
            return Err(AppError::conflict(CLASS_EXISTS));
        }

        let class = store
            .insert_class(NewClass {
                title,
                department: department.id,
            })
            .await
            .map_err(class_exists)?;

        info!(class_id = %class.id, department_id = %department.department_id, "class created");
        Ok(class)
    }

    #[instrument(skip(store))]
    pub async fn update_class(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: UpdateClassDto,
    ) -> AppResult<Class> {
        let resolved = Pipeline::new()
            .organization()
            .org_admin()
            .run(store, ctx)
            .await?;
        let organization = resolved.organization()?;
        let id = dto.id.ok_or_else(|| AppError::missing_parameter("id"))?;
        let title = required_title(dto.title)?;

        let scoped = ClassFilter {
            id: Some(id),
            organization: Some(organization.id),
            ..Default::default()
        };
        let class = store
            .find_class(&scoped)
            .await?
            .ok_or_else(|| AppError::not_found("invalid id"))?;

        if class.title != title {
            let duplicate = ClassFilter {
                department: Some(class.department),
                title: Some(title.clone()),
                ..Default::default()
            };
            if store.find_class(&duplicate).await?.is_some() {
                return Err(AppError::conflict(CLASS_EXISTS));
            }
        }

        store
            .update_class(class.id, &title)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("invalid id"),
                other => class_exists(other),
            })
    }

    #[instrument(skip(store))]
    pub async fn delete_class(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: DeleteClassDto,
    ) -> AppResult<()> {
        let resolved = Pipeline::new()
            .organization()
            .org_admin()
            .run(store, ctx)
            .await?;
        let organization = resolved.organization()?;
        let id = dto.id.ok_or_else(|| AppError::missing_parameter("id"))?;

        let scoped = ClassFilter {
            id: Some(id),
            organization: Some(organization.id),
            ..Default::default()
        };
        let class = store
            .find_class(&scoped)
            .await?
            .ok_or_else(|| AppError::not_found("invalid id"))?;

        store
            .soft_delete_class(class.id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("invalid id"),
                other => other.into(),
            })?;

        track_soft_delete("class");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_title_is_missing() {
        assert_eq!(
            required_title(None).unwrap_err().message(),
            "title is not passed"
        );
        assert!(required_title(Some("  ".to_string())).is_err());
        assert_eq!(required_title(Some("Grade 7".to_string())).unwrap(), "Grade 7");
    }

    #[test]
    fn test_title_violation_is_conflict() {
        let err = class_exists(StoreError::UniqueViolation(CLASS_TITLE_KEY.to_string()));
        assert_eq!(err.message(), CLASS_EXISTS);
    }
}
