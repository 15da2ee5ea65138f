// src/error.rs
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Constraint violated: {0}")]
  Conflict(String),

  #[error("Quantity must be at least 1 (got {0})")]
  InvalidQuantity(i32),

  #[error("Product not found: {0}")]
  UnknownProduct(Uuid),

  #[error("Category not found: {0}")]
  UnknownCategory(Uuid),

  #[error("Database error: {0}")]
  Database(#[source] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),
}

/// Postgres SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for `foreign_key_violation`.
pub(crate) const FOREIGN_KEY_VIOLATION: &str = "23503";

// Unique violations are a normal outcome for callers (duplicate slug), everything else
// stays an opaque database fault.
impl From<sqlx::Error> for StoreError {
  fn from(err: sqlx::Error) -> Self {
    if let sqlx::Error::Database(db_err) = &err {
      if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
        let constraint = db_err.constraint().unwrap_or("unique").to_string();
        return StoreError::Conflict(constraint);
      }
    }
    StoreError::Database(err)
  }
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
