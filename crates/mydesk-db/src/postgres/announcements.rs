use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use tracing::instrument;

use mydesk_models::announcements::{
    Announcement, AnnouncementChanges, AnnouncementFilter, AnnouncementOrigin, NewAnnouncement,
};
use mydesk_models::ids::{AnnouncementId, OrganizationKey, UserId};

use super::{PgStore, expect_affected};
use crate::error::{StoreError, StoreResult};
use crate::repository::AnnouncementRepository;
use crate::scoped::ScopedQuery;

const ANNOUNCEMENT_SELECT: &str = "SELECT a.id, a.user_id, a.organization_id, a.title, \
     a.description, a.data, a.date, a.visible, a.origin, a.is_public, a.acknowledge, \
     a.is_active, a.created_at, a.updated_at \
     FROM announcements a JOIN organizations o ON o.id = a.organization_id \
     WHERE a.is_active = TRUE";

const ANNOUNCEMENT_COLUMNS: &str = "id, user_id, organization_id, title, description, data, \
     date, visible, origin, is_public, acknowledge, is_active, created_at, updated_at";

#[derive(FromRow)]
struct AnnouncementRow {
    id: AnnouncementId,
    user_id: UserId,
    organization_id: OrganizationKey,
    title: String,
    description: Option<String>,
    data: Option<String>,
    date: Option<DateTime<Utc>>,
    visible: bool,
    origin: Json<AnnouncementOrigin>,
    is_public: bool,
    acknowledge: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AnnouncementRow> for Announcement {
    fn from(row: AnnouncementRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            organization_id: row.organization_id,
            title: row.title,
            description: row.description,
            data: row.data,
            date: row.date,
            visible: row.visible,
            origin: row.origin.0,
            is_public: row.is_public,
            acknowledge: row.acknowledge,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl AnnouncementRepository for PgStore {
    async fn find_announcements(
        &self,
        filter: &AnnouncementFilter,
    ) -> StoreResult<Vec<Announcement>> {
        let mut query = ScopedQuery::new(ANNOUNCEMENT_SELECT)
            .eq("a.id", filter.id)
            .eq("o.org_id", filter.org_id.clone())
            .gte("a.date", filter.start_date)
            .lte("a.date", filter.end_date)
            .eq("a.is_public", filter.is_public)
            .eq("a.user_id", filter.author);
        query.push(" ORDER BY a.created_at DESC, a.id DESC");

        let rows: Vec<AnnouncementRow> = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Announcement::from).collect())
    }

    #[instrument(skip(self))]
    async fn insert_announcement(&self, new: NewAnnouncement) -> StoreResult<Announcement> {
        let row = sqlx::query_as::<_, AnnouncementRow>(&format!(
            "INSERT INTO announcements \
                 (user_id, organization_id, title, description, data, date, visible, origin, \
                  is_public, acknowledge) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {ANNOUNCEMENT_COLUMNS}"
        ))
        .bind(new.user_id)
        .bind(new.organization_id)
        .bind(&new.title)
        .bind(new.description.as_deref())
        .bind(new.data.as_deref())
        .bind(new.date)
        .bind(new.visible)
        .bind(Json(&new.origin))
        .bind(new.is_public)
        .bind(new.acknowledge)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn update_announcement(
        &self,
        id: AnnouncementId,
        changes: &AnnouncementChanges,
    ) -> StoreResult<Announcement> {
        let row = sqlx::query_as::<_, AnnouncementRow>(&format!(
            "UPDATE announcements SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 data = COALESCE($4, data), \
                 date = COALESCE($5, date), \
                 visible = COALESCE($6, visible), \
                 is_public = COALESCE($7, is_public), \
                 acknowledge = COALESCE($8, acknowledge), \
                 updated_at = NOW() \
             WHERE id = $1 AND is_active = TRUE \
             RETURNING {ANNOUNCEMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.data.as_deref())
        .bind(changes.date)
        .bind(changes.visible)
        .bind(changes.is_public)
        .bind(changes.acknowledge)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn soft_delete_announcement(&self, id: AnnouncementId) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE announcements SET is_active = FALSE, updated_at = NOW() \
             WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        expect_affected(result.rows_affected())
    }
}
