use async_trait::async_trait;
use tracing::instrument;

use mydesk_models::ids::OrganizationKey;
use mydesk_models::organizations::{
    NewOrganization, Organization, OrganizationChanges, OrganizationFilter,
};

use super::{PgStore, expect_affected};
use crate::error::{StoreError, StoreResult};
use crate::repository::OrganizationRepository;
use crate::scoped::ScopedQuery;

const ORGANIZATION_SELECT: &str = "SELECT o.id, o.org_id, o.name, o.owner_id, \
     o.accepting_requests, o.is_active, o.created_at \
     FROM organizations o WHERE o.is_active = TRUE";

const ORGANIZATION_COLUMNS: &str =
    "id, org_id, name, owner_id, accepting_requests, is_active, created_at";

#[async_trait]
impl OrganizationRepository for PgStore {
    async fn find_organizations(
        &self,
        filter: &OrganizationFilter,
    ) -> StoreResult<Vec<Organization>> {
        let mut query = ScopedQuery::new(ORGANIZATION_SELECT)
            .eq("o.id", filter.id)
            .eq("o.org_id", filter.org_id.clone())
            .eq("o.owner_id", filter.owner)
            .eq("o.accepting_requests", filter.accepting_requests);
        query.push(" ORDER BY o.id");

        Ok(query.fetch_all(&self.pool).await?)
    }

    #[instrument(skip(self))]
    async fn insert_organization(&self, new: NewOrganization) -> StoreResult<Organization> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            "INSERT INTO organizations (org_id, name, owner_id) VALUES ($1, $2, $3) \
             RETURNING {ORGANIZATION_COLUMNS}"
        ))
        .bind(&new.org_id)
        .bind(&new.name)
        .bind(new.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(organization)
    }

    #[instrument(skip(self))]
    async fn update_organization(
        &self,
        id: OrganizationKey,
        changes: &OrganizationChanges,
    ) -> StoreResult<Organization> {
        sqlx::query_as::<_, Organization>(&format!(
            "UPDATE organizations SET \
                 name = COALESCE($2, name), \
                 accepting_requests = COALESCE($3, accepting_requests) \
             WHERE id = $1 AND is_active = TRUE \
             RETURNING {ORGANIZATION_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.accepting_requests)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self))]
    async fn soft_delete_organization(&self, id: OrganizationKey) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE organizations SET is_active = FALSE WHERE id = $1 AND is_active = TRUE")
                .bind(id)
                .execute(&self.pool)
                .await?;

        expect_affected(result.rows_affected())
    }
}
