use async_trait::async_trait;
use tracing::instrument;

use mydesk_models::classes::{Class, ClassFilter, NewClass};
use mydesk_models::ids::ClassId;

use super::{PgStore, expect_affected};
use crate::error::{StoreError, StoreResult};
use crate::repository::ClassRepository;
use crate::scoped::ScopedQuery;

const CLASS_SELECT: &str = "SELECT c.id, c.title, c.department_id AS department, \
     d.name AS department_name, d.department_id, c.is_active, c.created_at \
     FROM classes c JOIN departments d ON d.id = c.department_id \
     WHERE c.is_active = TRUE";

/// Projects a `changed` CTE of class rows into the serialized shape.
const CHANGED_CLASS_PROJECTION: &str = "SELECT x.id, x.title, x.department_id AS department, \
     d.name AS department_name, d.department_id, x.is_active, x.created_at \
     FROM changed x JOIN departments d ON d.id = x.department_id";

#[async_trait]
impl ClassRepository for PgStore {
    async fn find_classes(&self, filter: &ClassFilter) -> StoreResult<Vec<Class>> {
        let mut query = ScopedQuery::new(CLASS_SELECT)
            .eq("c.id", filter.id)
            .eq("d.organization_id", filter.organization)
            .eq("c.department_id", filter.department)
            .eq("c.title", filter.title.clone());
        query.push(" ORDER BY c.id");

        Ok(query.fetch_all(&self.pool).await?)
    }

    #[instrument(skip(self))]
    async fn insert_class(&self, new: NewClass) -> StoreResult<Class> {
        let class = sqlx::query_as::<_, Class>(&format!(
            "WITH changed AS ( \
                 INSERT INTO classes (title, department_id) VALUES ($1, $2) RETURNING * \
             ) {CHANGED_CLASS_PROJECTION}"
        ))
        .bind(&new.title)
        .bind(new.department)
        .fetch_one(&self.pool)
        .await?;

        Ok(class)
    }

    #[instrument(skip(self))]
    async fn update_class(&self, id: ClassId, title: &str) -> StoreResult<Class> {
        sqlx::query_as::<_, Class>(&format!(
            "WITH changed AS ( \
                 UPDATE classes SET title = $2 WHERE id = $1 AND is_active = TRUE RETURNING * \
             ) {CHANGED_CLASS_PROJECTION}"
        ))
        .bind(id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self))]
    async fn soft_delete_class(&self, id: ClassId) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE classes SET is_active = FALSE WHERE id = $1 AND is_active = TRUE")
                .bind(id)
                .execute(&self.pool)
                .await?;

        expect_affected(result.rows_affected())
    }
}
