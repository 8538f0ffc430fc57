//! Administrative commands behind the `mydesk-cli` binary.

use tracing::info;
use validator::Validate;

use mydesk_auth::create_access_token;
use mydesk_config::JwtConfig;
use mydesk_core::{AppError, AppResult};
use mydesk_db::{PgPool, Store, USER_EMAIL_KEY, run_migrations};
use mydesk_models::ids::UserId;
use mydesk_models::users::{CreateUserDto, User};

pub async fn migrate(pool: &PgPool) -> AppResult<()> {
    run_migrations(pool).await?;
    info!("migrations applied");
    Ok(())
}

/// Inserts a user under a fresh id. Users otherwise only ever arrive from
/// the identity provider.
pub async fn create_user(store: &dyn Store, dto: CreateUserDto) -> AppResult<User> {
    dto.validate()?;

    store
        .insert_user(dto.into_new_user(UserId::new()))
        .await
        .map_err(|err| {
            if err.is_unique_violation_of(USER_EMAIL_KEY) {
                return AppError::conflict("User with this email already exists");
            }
            AppError::from(err)
        })
}

/// A development access token for an existing user id.
pub fn issue_token(user_id: UserId, email: &str, jwt_config: &JwtConfig) -> AppResult<String> {
    create_access_token(user_id.into_inner(), email, jwt_config)
}
