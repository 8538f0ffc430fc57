use std::sync::Arc;

use mydesk_config::{AppConfig, CorsConfig, JwtConfig};
use mydesk_db::{PgStore, Store, StoreError, init_db_pool, run_migrations};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &AppConfig) -> Self {
        Self {
            store,
            jwt_config: config.jwt.clone(),
            cors_config: config.cors.clone(),
        }
    }

    /// The store as a trait object, the form every service takes.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

/// Connects to PostgreSQL, applies pending migrations and builds the state.
pub async fn init_app_state(config: &AppConfig) -> Result<AppState, StoreError> {
    let database_url = config.server.database_url.as_deref().ok_or_else(|| {
        StoreError::Database(sqlx::Error::Configuration(
            "DATABASE_URL must be set".into(),
        ))
    })?;

    let pool = init_db_pool(database_url, config.server.database_max_connections).await?;
    run_migrations(&pool).await?;

    Ok(AppState::new(Arc::new(PgStore::new(pool)), config))
}
