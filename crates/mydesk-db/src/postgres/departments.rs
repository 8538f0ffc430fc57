use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::FromRow;
use tracing::instrument;

use mydesk_models::departments::{Department, DepartmentChanges, DepartmentFilter, NewDepartment};
use mydesk_models::ids::{DepartmentKey, UserId};
use mydesk_models::users::UserSummary;

use super::{PgStore, expect_affected};
use crate::error::{StoreError, StoreResult};
use crate::repository::DepartmentRepository;
use crate::scoped::ScopedQuery;

const DEPARTMENT_SELECT: &str = "SELECT d.id, d.department_id, d.name, d.contact_name, \
     d.contact_phone, d.contact_email, d.organization_id, d.owner_id, d.is_active, d.created_at \
     FROM departments d JOIN organizations o ON o.id = d.organization_id \
     WHERE d.is_active = TRUE";

const DEPARTMENT_COLUMNS: &str = "id, department_id, name, contact_name, contact_phone, \
     contact_email, organization_id, owner_id, is_active, created_at";

#[derive(FromRow)]
struct RequestingUserRow {
    department_id: DepartmentKey,
    #[sqlx(flatten)]
    user: UserSummary,
}

impl PgStore {
    /// Fills `requesting_users` for every department in one query.
    async fn attach_requesting_users(
        &self,
        mut departments: Vec<Department>,
    ) -> StoreResult<Vec<Department>> {
        if departments.is_empty() {
            return Ok(departments);
        }

        let keys: Vec<i64> = departments.iter().map(|d| d.id.get()).collect();
        let rows = sqlx::query_as::<_, RequestingUserRow>(
            r#"
            SELECT r.department_id, u.id, u.email, u.first_name, u.last_name
            FROM department_join_requests r
            JOIN users u ON u.id = r.user_id
            WHERE r.department_id = ANY($1)
            ORDER BY r.created_at, u.email
            "#,
        )
        .bind(keys)
        .fetch_all(&self.pool)
        .await?;

        let mut by_department: HashMap<DepartmentKey, Vec<UserSummary>> = HashMap::new();
        for row in rows {
            by_department
                .entry(row.department_id)
                .or_default()
                .push(row.user);
        }
        for department in &mut departments {
            department.requesting_users = by_department.remove(&department.id).unwrap_or_default();
        }

        Ok(departments)
    }

    async fn department_by_key(&self, id: DepartmentKey) -> StoreResult<Department> {
        let filter = DepartmentFilter {
            id: Some(id),
            ..Default::default()
        };
        self.find_department(&filter)
            .await?
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl DepartmentRepository for PgStore {
    async fn find_departments(&self, filter: &DepartmentFilter) -> StoreResult<Vec<Department>> {
        let mut query = ScopedQuery::new(DEPARTMENT_SELECT)
            .eq("d.id", filter.id)
            .eq("d.department_id", filter.department_id.clone())
            .eq("o.org_id", filter.org_id.clone())
            .eq("d.organization_id", filter.organization)
            .eq("d.owner_id", filter.owner);
        query.push(" ORDER BY d.id");

        let departments = query.fetch_all(&self.pool).await?;
        self.attach_requesting_users(departments).await
    }

    #[instrument(skip(self))]
    async fn insert_department(&self, new: NewDepartment) -> StoreResult<Department> {
        let mut tx = self.pool.begin().await?;

        let department = sqlx::query_as::<_, Department>(&format!(
            "INSERT INTO departments \
                 (department_id, name, contact_name, contact_phone, contact_email, organization_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {DEPARTMENT_COLUMNS}"
        ))
        .bind(&new.department_id)
        .bind(&new.name)
        .bind(new.contact_name.as_deref())
        .bind(new.contact_phone.as_deref())
        .bind(new.contact_email.as_deref())
        .bind(new.organization_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(user) = new.requested_by {
            sqlx::query("INSERT INTO department_join_requests (department_id, user_id) VALUES ($1, $2)")
                .bind(department.id)
                .bind(user)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let mut departments = self.attach_requesting_users(vec![department]).await?;
        departments.pop().ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self))]
    async fn update_department(
        &self,
        id: DepartmentKey,
        changes: &DepartmentChanges,
    ) -> StoreResult<Department> {
        let result = sqlx::query(
            r#"
            UPDATE departments SET
                name = COALESCE($2, name),
                contact_name = COALESCE($3, contact_name),
                contact_phone = COALESCE($4, contact_phone),
                contact_email = COALESCE($5, contact_email)
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.contact_name.as_deref())
        .bind(changes.contact_phone.as_deref())
        .bind(changes.contact_email.as_deref())
        .execute(&self.pool)
        .await?;
        expect_affected(result.rows_affected())?;

        self.department_by_key(id).await
    }

    #[instrument(skip(self))]
    async fn soft_delete_department(&self, id: DepartmentKey) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE departments SET is_active = FALSE WHERE id = $1 AND is_active = TRUE")
                .bind(id)
                .execute(&self.pool)
                .await?;

        expect_affected(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn add_join_request(&self, id: DepartmentKey, user: UserId) -> StoreResult<()> {
        sqlx::query("INSERT INTO department_join_requests (department_id, user_id) VALUES ($1, $2)")
            .bind(id)
            .bind(user)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn approve_join_request(
        &self,
        id: DepartmentKey,
        user: UserId,
    ) -> StoreResult<Department> {
        let mut tx = self.pool.begin().await?;

        let removed =
            sqlx::query("DELETE FROM department_join_requests WHERE department_id = $1 AND user_id = $2")
                .bind(id)
                .bind(user)
                .execute(&mut *tx)
                .await?;
        expect_affected(removed.rows_affected())?;

        let updated =
            sqlx::query("UPDATE departments SET owner_id = $2 WHERE id = $1 AND is_active = TRUE")
                .bind(id)
                .bind(user)
                .execute(&mut *tx)
                .await?;
        expect_affected(updated.rows_affected())?;

        tx.commit().await?;

        self.department_by_key(id).await
    }
}
