use async_trait::async_trait;
use tracing::instrument;

use mydesk_models::ids::SectionId;
use mydesk_models::sections::{NewSection, Section, SectionFilter};

use super::{PgStore, expect_affected};
use crate::error::StoreResult;
use crate::repository::SectionRepository;
use crate::scoped::ScopedQuery;

const SECTION_SELECT: &str = "SELECT s.id, s.title, s.class_id AS class, c.title AS class_title, \
     c.department_id AS department, s.is_active, s.created_at \
     FROM sections s \
     JOIN classes c ON c.id = s.class_id \
     JOIN departments d ON d.id = c.department_id \
     WHERE s.is_active = TRUE";

#[async_trait]
impl SectionRepository for PgStore {
    async fn find_sections(&self, filter: &SectionFilter) -> StoreResult<Vec<Section>> {
        let mut query = ScopedQuery::new(SECTION_SELECT)
            .eq("s.id", filter.id)
            .eq("d.organization_id", filter.organization)
            .eq("c.department_id", filter.department)
            .eq("s.class_id", filter.class);
        query.push(" ORDER BY s.id");

        Ok(query.fetch_all(&self.pool).await?)
    }

    #[instrument(skip(self))]
    async fn insert_section(&self, new: NewSection) -> StoreResult<Section> {
        let section = sqlx::query_as::<_, Section>(
            r#"
            WITH changed AS (
                INSERT INTO sections (title, class_id) VALUES ($1, $2) RETURNING *
            )
            SELECT x.id, x.title, x.class_id AS class, c.title AS class_title,
                   c.department_id AS department, x.is_active, x.created_at
            FROM changed x JOIN classes c ON c.id = x.class_id
            "#,
        )
        .bind(&new.title)
        .bind(new.class)
        .fetch_one(&self.pool)
        .await?;

        Ok(section)
    }

    #[instrument(skip(self))]
    async fn soft_delete_section(&self, id: SectionId) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE sections SET is_active = FALSE WHERE id = $1 AND is_active = TRUE")
                .bind(id)
                .execute(&self.pool)
                .await?;

        expect_affected(result.rows_affected())
    }
}
