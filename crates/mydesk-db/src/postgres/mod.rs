//! PostgreSQL implementation of the repository traits.
//!
//! Queries are built at runtime (`sqlx::query_as::<_, T>` and
//! [`ScopedQuery`](crate::ScopedQuery)) so the crate compiles without a live
//! database or an offline query cache.

mod announcements;
mod classes;
mod departments;
mod organizations;
mod sections;
mod students;
mod subjects;
mod teachers;
mod users;

use sqlx::PgPool;

use crate::error::{StoreError, StoreResult};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps "no row changed" to [`StoreError::NotFound`].
pub(crate) fn expect_affected(rows: u64) -> StoreResult<()> {
    if rows == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}
