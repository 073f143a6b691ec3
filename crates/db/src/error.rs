//! Typed error type for the db crate.

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(sqlx::Error),

    #[error("row not found")]
    NotFound,

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A UNIQUE constraint rejected the write.
    #[error("duplicate value: {0}")]
    UniqueViolation(String),

    /// A FOREIGN KEY constraint rejected the write or delete.
    #[error("referenced row missing or still in use: {0}")]
    ForeignKeyViolation(String),

    /// The write would break an invariant checked inside a transaction.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A guarded stock update would drive the quantity below zero.
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return DbError::UniqueViolation(db_err.message().to_string())
                }
                ErrorKind::ForeignKeyViolation => {
                    return DbError::ForeignKeyViolation(db_err.message().to_string())
                }
                _ => {}
            }
        }
        DbError::Sqlx(err)
    }
}
