//! Custom error types for the common library
//!
//! Every store in the application reports failures through [`DatabaseError`].
//! Raw driver errors are translated here, at the store boundary, so callers
//! only ever match on "not found", "already exists" or an opaque failure.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// The query matched no rows
    #[error("Record not found")]
    NotFound,

    /// A uniqueness constraint rejected the write
    #[error("Record already exists")]
    AlreadyExists,
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => DatabaseError::NotFound,
            SqlxError::Database(ref db_err) if db_err.is_unique_violation() => {
                DatabaseError::AlreadyExists
            }
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
                DatabaseError::Connection(err)
            }
            other => DatabaseError::Query(other),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
