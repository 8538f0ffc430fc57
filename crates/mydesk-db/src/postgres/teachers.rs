use async_trait::async_trait;
use tracing::instrument;

use mydesk_models::ids::TeacherId;
use mydesk_models::teachers::{NewTeacher, Teacher, TeacherFilter};

use super::{PgStore, expect_affected};
use crate::error::StoreResult;
use crate::repository::TeacherRepository;
use crate::scoped::ScopedQuery;

// Teachers only count while their department is live.
const TEACHER_SELECT: &str = "SELECT t.id, t.user_id, u.email, t.department_id AS department, \
     t.is_active, t.created_at \
     FROM teachers t \
     JOIN users u ON u.id = t.user_id \
     JOIN departments d ON d.id = t.department_id \
     WHERE t.is_active = TRUE AND d.is_active = TRUE";

#[async_trait]
impl TeacherRepository for PgStore {
    async fn find_teachers(&self, filter: &TeacherFilter) -> StoreResult<Vec<Teacher>> {
        let mut query = ScopedQuery::new(TEACHER_SELECT)
            .eq("t.id", filter.id)
            .eq("d.organization_id", filter.organization)
            .eq("t.department_id", filter.department)
            .eq("t.user_id", filter.user);
        query.push(" ORDER BY t.id");

        Ok(query.fetch_all(&self.pool).await?)
    }

    #[instrument(skip(self))]
    async fn insert_teacher(&self, new: NewTeacher) -> StoreResult<Teacher> {
        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            WITH changed AS (
                INSERT INTO teachers (user_id, department_id) VALUES ($1, $2) RETURNING *
            )
            SELECT x.id, x.user_id, u.email, x.department_id AS department,
                   x.is_active, x.created_at
            FROM changed x JOIN users u ON u.id = x.user_id
            "#,
        )
        .bind(new.user_id)
        .bind(new.department)
        .fetch_one(&self.pool)
        .await?;

        Ok(teacher)
    }

    #[instrument(skip(self))]
    async fn soft_delete_teacher(&self, id: TeacherId) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE teachers SET is_active = FALSE WHERE id = $1 AND is_active = TRUE")
                .bind(id)
                .execute(&self.pool)
                .await?;

        expect_affected(result.rows_affected())
    }
}
