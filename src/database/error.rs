use std::collections::HashMap;

use thiserror::Error;

/// Errors raised by a `TaskStore` implementation
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Failures of the task operations, in the order they are checked:
/// identity first, then existence, then ownership, then field validation.
#[derive(Debug, Error)]
pub enum TaskError {
    /// No verified identity attached to the call
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Not found")]
    NotFound,

    /// The record exists but belongs to someone else
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

impl TaskError {
    pub(crate) fn check_fields(field_errors: HashMap<String, String>) -> Result<(), TaskError> {
        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(TaskError::Validation {
                message: "Invalid task fields".to_string(),
                field_errors,
            })
        }
    }
}
