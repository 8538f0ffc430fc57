use tracing::{info, instrument};

use mydesk_core::{AppError, AppResult};
use mydesk_db::{ORG_ID_KEY, Store, StoreError};
use mydesk_models::organizations::NewOrganization;

use crate::context::{Pipeline, RequestContext, checks};
use crate::metrics::track_soft_delete;
use crate::modules::organizations::model::{
    CreateOrganizationDto, Organization, OrganizationFilter, UpdateOrganizationDto,
};

pub struct OrganizationService;

impl OrganizationService {
    #[instrument(skip(store))]
    pub async fn get_organizations(
        store: &dyn Store,
        ctx: &RequestContext,
        filter: OrganizationFilter,
    ) -> AppResult<Vec<Organization>> {
        Pipeline::new().run(store, ctx).await?;

        Ok(store.find_organizations(&filter).await?)
    }

    #[instrument(skip(store))]
    pub async fn create_organization(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: CreateOrganizationDto,
    ) -> AppResult<Organization> {
        let resolved = Pipeline::new().run(store, ctx).await?;

        let new = NewOrganization {
            org_id: dto.org_id,
            name: dto.name,
            owner_id: resolved.user_id(),
        };

        let organization = store.insert_organization(new).await.map_err(|err| {
            if err.is_unique_violation_of(ORG_ID_KEY) {
                return AppError::conflict("org_id already exists");
            }
            AppError::from(err)
        })?;

        info!(org_id = %organization.org_id, "organization created");
        Ok(organization)
    }

    #[instrument(skip(store))]
    pub async fn update_organization(
        store: &dyn Store,
        ctx: &RequestContext,
        dto: UpdateOrganizationDto,
    ) -> AppResult<Organization> {
        let resolved = Pipeline::new()
            .organization()
            .org_admin()
            .run(store, ctx)
            .await?;
        let organization = resolved.organization()?;

        store
            .update_organization(organization.id, &dto.changes)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("invalid org_id"),
                other => other.into(),
            })
    }

    #[instrument(skip(store))]
    pub async fn delete_organization(store: &dyn Store, ctx: &RequestContext) -> AppResult<()> {
        let resolved = Pipeline::new().run(store, ctx).await?;
        let org_id = ctx
            .org_id
            .as_deref()
            .ok_or_else(|| AppError::missing_parameter("org_id"))?;
        let filter = OrganizationFilter {
            org_id: Some(org_id.to_string()),
            ..Default::default()
        };
        let organization = store
            .find_organization(&filter)
            .await?
            .ok_or_else(|| AppError::not_found("invalid id"))?;
        checks::require_organization_admin(resolved.user_id(), &organization)?;

        store
            .soft_delete_organization(organization.id)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => AppError::not_found("invalid id"),
                other => other.into(),
            })?;

        track_soft_delete("organization");
        info!(org_id = %organization.org_id, "organization deleted");
        Ok(())
    }
}
