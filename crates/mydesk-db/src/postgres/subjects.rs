use async_trait::async_trait;
use tracing::instrument;

use mydesk_models::ids::SubjectId;
use mydesk_models::subjects::{NewSubject, Subject, SubjectFilter};

use super::{PgStore, expect_affected};
use crate::error::StoreResult;
use crate::repository::SubjectRepository;
use crate::scoped::ScopedQuery;

const SUBJECT_SELECT: &str = "SELECT sb.id, sb.title, sb.section_id AS section, \
     sb.teacher_id AS teacher, c.department_id AS department, sb.is_active, sb.created_at \
     FROM subjects sb \
     JOIN sections s ON s.id = sb.section_id \
     JOIN classes c ON c.id = s.class_id \
     JOIN departments d ON d.id = c.department_id \
     WHERE sb.is_active = TRUE";

#[async_trait]
impl SubjectRepository for PgStore {
    async fn find_subjects(&self, filter: &SubjectFilter) -> StoreResult<Vec<Subject>> {
        let mut query = ScopedQuery::new(SUBJECT_SELECT)
            .eq("sb.id", filter.id)
            .eq("d.organization_id", filter.organization)
            .eq("c.department_id", filter.department)
            .eq("sb.section_id", filter.section)
            .eq("sb.teacher_id", filter.teacher);
        query.push(" ORDER BY sb.id");

        Ok(query.fetch_all(&self.pool).await?)
    }

    #[instrument(skip(self))]
    async fn insert_subject(&self, new: NewSubject) -> StoreResult<Subject> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            WITH changed AS (
                INSERT INTO subjects (title, section_id, teacher_id) VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT x.id, x.title, x.section_id AS section, x.teacher_id AS teacher,
                   c.department_id AS department, x.is_active, x.created_at
            FROM changed x
            JOIN sections s ON s.id = x.section_id
            JOIN classes c ON c.id = s.class_id
            "#,
        )
        .bind(&new.title)
        .bind(new.section)
        .bind(new.teacher)
        .fetch_one(&self.pool)
        .await?;

        Ok(subject)
    }

    #[instrument(skip(self))]
    async fn soft_delete_subject(&self, id: SubjectId) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE subjects SET is_active = FALSE WHERE id = $1 AND is_active = TRUE")
                .bind(id)
                .execute(&self.pool)
                .await?;

        expect_affected(result.rows_affected())
    }
}
