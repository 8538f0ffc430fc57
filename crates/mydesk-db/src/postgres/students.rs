use async_trait::async_trait;
use tracing::instrument;

use mydesk_models::ids::{SectionId, StudentId, UserId};
use mydesk_models::students::{Student, StudentFilter};

use super::{PgStore, expect_affected};
use crate::error::{StoreError, StoreResult};
use crate::repository::StudentRepository;
use crate::scoped::ScopedQuery;

const STUDENT_SELECT: &str = "SELECT st.id, st.user_id, u.email, st.section_id AS section, \
     st.requested_section_id AS requested_section, st.is_active, st.created_at \
     FROM students st \
     JOIN users u ON u.id = st.user_id \
     LEFT JOIN sections s ON s.id = st.section_id \
     LEFT JOIN classes c ON c.id = s.class_id \
     LEFT JOIN departments d ON d.id = c.department_id \
     LEFT JOIN sections rs ON rs.id = st.requested_section_id \
     LEFT JOIN classes rc ON rc.id = rs.class_id \
     WHERE st.is_active = TRUE";

impl PgStore {
    async fn students_by_ids(&self, ids: Vec<i64>) -> StoreResult<Vec<Student>> {
        let mut query = ScopedQuery::new(STUDENT_SELECT).any("st.id", Some(ids));
        query.push(" ORDER BY st.id");
        Ok(query.fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl StudentRepository for PgStore {
    async fn find_students(&self, filter: &StudentFilter) -> StoreResult<Vec<Student>> {
        let mut query = ScopedQuery::new(STUDENT_SELECT)
            .eq("st.id", filter.id)
            .eq("st.user_id", filter.user)
            .eq("d.organization_id", filter.organization)
            .eq("c.department_id", filter.department)
            .eq("st.section_id", filter.section)
            .eq("st.requested_section_id", filter.requested_section)
            .eq("rc.department_id", filter.requested_department);
        query.push(" ORDER BY st.id");

        Ok(query.fetch_all(&self.pool).await?)
    }

    #[instrument(skip(self))]
    async fn request_section(&self, user: UserId, section: SectionId) -> StoreResult<Student> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(StudentId,)> = sqlx::query_as(
            "SELECT id FROM students WHERE user_id = $1 AND is_active = TRUE FOR UPDATE",
        )
        .bind(user)
        .fetch_optional(&mut *tx)
        .await?;

        let (id,): (StudentId,) = match existing {
            Some((id,)) => {
                sqlx::query("UPDATE students SET requested_section_id = $2 WHERE id = $1")
                    .bind(id)
                    .bind(section)
                    .execute(&mut *tx)
                    .await?;
                (id,)
            }
            None => {
                sqlx::query_as(
                    "INSERT INTO students (user_id, requested_section_id) VALUES ($1, $2) RETURNING id",
                )
                .bind(user)
                .bind(section)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;

        self.students_by_ids(vec![id.get()])
            .await?
            .pop()
            .ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self))]
    async fn admit_students(&self, ids: &[StudentId]) -> StoreResult<Vec<Student>> {
        let mut keys: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        keys.sort_unstable();
        keys.dedup();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE students
            SET section_id = requested_section_id, requested_section_id = NULL
            WHERE id = ANY($1) AND is_active = TRUE AND requested_section_id IS NOT NULL
            "#,
        )
        .bind(&keys)
        .execute(&mut *tx)
        .await?;

        // Dropping the transaction rolls every row back.
        if result.rows_affected() != keys.len() as u64 {
            return Err(StoreError::NotFound);
        }

        tx.commit().await?;

        self.students_by_ids(keys).await
    }

    #[instrument(skip(self))]
    async fn soft_delete_student(&self, id: StudentId) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE students SET is_active = FALSE WHERE id = $1 AND is_active = TRUE")
                .bind(id)
                .execute(&self.pool)
                .await?;

        expect_affected(result.rows_affected())
    }
}
