//! Storage error type.
//!
//! Store implementations speak [`StoreError`]; services convert it into the
//! HTTP-facing [`AppError`] at their boundary, usually after mapping the
//! cases they expect (a unique violation on a known constraint, a missing row)
//! to a resource-specific message.

use mydesk_core::AppError;
use thiserror::Error;

/// Unique constraint on `organizations.org_id`.
pub const ORG_ID_KEY: &str = "organizations_org_id_key";
/// Unique constraint on `departments.department_id`.
pub const DEPARTMENT_ID_KEY: &str = "departments_department_id_key";
/// Primary key of the pending join requests table.
pub const JOIN_REQUEST_KEY: &str = "department_join_requests_pkey";
/// Partial unique index on live `(department_id, title)` classes.
pub const CLASS_TITLE_KEY: &str = "classes_department_title_live_key";
/// Partial unique index on live `(user_id, department_id)` teachers.
pub const TEACHER_KEY: &str = "teachers_user_department_live_key";
/// Partial unique index on live students per user.
pub const STUDENT_USER_KEY: &str = "students_user_live_key";
/// Unique constraint on `users.email`.
pub const USER_EMAIL_KEY: &str = "users_email_key";

#[derive(Debug, Error)]
pub enum StoreError {
    /// No live row matched.
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn is_unique_violation_of(&self, constraint: &str) -> bool {
        matches!(self, StoreError::UniqueViolation(name) if name == constraint)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let classified = match &err {
            sqlx::Error::RowNotFound => Some(StoreError::NotFound),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Some(
                StoreError::UniqueViolation(db_err.constraint().unwrap_or_default().to_string()),
            ),
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => Some(
                StoreError::ForeignKeyViolation(
                    db_err.constraint().unwrap_or_default().to_string(),
                ),
            ),
            _ => None,
        };
        classified.unwrap_or(StoreError::Database(err))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::not_found("Record not found"),
            StoreError::UniqueViolation(_) => AppError::conflict("Record already exists"),
            StoreError::ForeignKeyViolation(_) => {
                AppError::invalid("Referenced record does not exist")
            }
            other => AppError::internal(other),
        }
    }
}
