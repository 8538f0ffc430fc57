use async_trait::async_trait;
use tracing::instrument;

use mydesk_models::ids::UserId;
use mydesk_models::users::{NewUser, User};

use super::PgStore;
use crate::error::StoreResult;
use crate::repository::UserRepository;

#[async_trait]
impl UserRepository for PgStore {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, first_name, last_name, is_active, created_at
            FROM users
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, first_name, last_name, is_active, created_at
            "#,
        )
        .bind(new.id)
        .bind(&new.email)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
