//! # MyDesk DB
//!
//! Database pool, migrations and entity repositories for the MyDesk API.
//!
//! Services depend on the [`Store`] trait object, implemented by:
//!
//! - [`PgStore`]: PostgreSQL through SQLx
//! - [`MemoryStore`]: process memory, used by the test suites
//!
//! Every entity lookup goes through a filter struct and returns live rows
//! only; see [`ScopedQuery`] for how filters become SQL.
//!
//! # Example
//!
//! ```ignore
//! use mydesk_db::{PgStore, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&database_url, 10).await?;
//! run_migrations(&pool).await?;
//! let store = PgStore::new(pool);
//! ```

mod error;
mod memory;
mod postgres;
mod repository;
mod scoped;

pub use error::{
    CLASS_TITLE_KEY, DEPARTMENT_ID_KEY, JOIN_REQUEST_KEY, ORG_ID_KEY, STUDENT_USER_KEY,
    StoreError, StoreResult, TEACHER_KEY, USER_EMAIL_KEY,
};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{
    AnnouncementRepository, ClassRepository, DepartmentRepository, OrganizationRepository,
    SectionRepository, Store, StudentRepository, SubjectRepository, TeacherRepository,
    UserRepository,
};
pub use scoped::ScopedQuery;

use sqlx::postgres::PgPoolOptions;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects a PostgreSQL pool.
///
/// Call once at startup; the pool is cheaply cloneable.
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> StoreResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    tracing::info!(max_connections, "database pool ready");
    Ok(pool)
}

/// Applies the embedded migrations in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> StoreResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("migrations applied");
    Ok(())
}
