//! Liveness-scoped SQL construction.
//!
//! [`ScopedQuery`] starts from a `SELECT ... WHERE <alias>.is_active = TRUE`
//! base and appends one ` AND <column> <op> $n` per supplied filter value.
//! Absent values append nothing, so the result selects live rows matching
//! every supplied field regardless of the order the filters were added in.
//!
//! ```ignore
//! let mut query = ScopedQuery::new(CLASS_SELECT)
//!     .eq("c.id", filter.id)
//!     .eq("d.organization_id", filter.organization);
//! query.push(" ORDER BY c.id");
//! let classes: Vec<Class> = query.fetch_all(&pool).await?;
//! ```

use sqlx::postgres::PgRow;
use sqlx::{Encode, FromRow, PgPool, Postgres, QueryBuilder, Type};

pub struct ScopedQuery<'a> {
    builder: QueryBuilder<'a, Postgres>,
}

impl<'a> ScopedQuery<'a> {
    /// `base` must already contain the `WHERE` clause selecting live rows.
    pub fn new(base: &str) -> Self {
        Self {
            builder: QueryBuilder::new(base),
        }
    }

    fn predicate<T>(mut self, column: &str, op: &str, value: Option<T>) -> Self
    where
        T: 'a + Encode<'a, Postgres> + Type<Postgres>,
    {
        if let Some(value) = value {
            self.builder
                .push(" AND ")
                .push(column)
                .push(" ")
                .push(op)
                .push(" ")
                .push_bind(value);
        }
        self
    }

    pub fn eq<T>(self, column: &str, value: Option<T>) -> Self
    where
        T: 'a + Encode<'a, Postgres> + Type<Postgres>,
    {
        self.predicate(column, "=", value)
    }

    /// Inclusive lower bound.
    pub fn gte<T>(self, column: &str, value: Option<T>) -> Self
    where
        T: 'a + Encode<'a, Postgres> + Type<Postgres>,
    {
        self.predicate(column, ">=", value)
    }

    /// Inclusive upper bound.
    pub fn lte<T>(self, column: &str, value: Option<T>) -> Self
    where
        T: 'a + Encode<'a, Postgres> + Type<Postgres>,
    {
        self.predicate(column, "<=", value)
    }

    /// `column = ANY($n)` over the supplied values.
    pub fn any<T>(mut self, column: &str, values: Option<Vec<T>>) -> Self
    where
        Vec<T>: 'a + Encode<'a, Postgres> + Type<Postgres>,
    {
        if let Some(values) = values {
            self.builder
                .push(" AND ")
                .push(column)
                .push(" = ANY(")
                .push_bind(values)
                .push(")");
        }
        self
    }

    /// Appends raw SQL, e.g. an `ORDER BY` clause.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.builder.push(sql);
        self
    }

    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    pub async fn fetch_all<T>(mut self, pool: &PgPool) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        self.builder.build_query_as::<T>().fetch_all(pool).await
    }
}
