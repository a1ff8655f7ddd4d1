use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("Context entry not found: {0}")]
    ContextNotFound(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl TodoError {
    pub fn to_error_code(&self) -> &'static str {
        match self {
            TodoError::TaskNotFound(_) => "TASK_NOT_FOUND",
            TodoError::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            TodoError::ContextNotFound(_) => "CONTEXT_NOT_FOUND",
            TodoError::DatabaseError(_) => "DATABASE_ERROR",
            TodoError::InvalidInput(_) => "INVALID_INPUT",
            TodoError::Duplicate(_) => "DUPLICATE",
            _ => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TodoError::TaskNotFound(_)
                | TodoError::CategoryNotFound(_)
                | TodoError::ContextNotFound(_)
        )
    }

    /// Classify a failed INSERT or UPDATE. A constraint that a concurrent
    /// writer tripped after validation passed becomes a client error carrying
    /// `conflict()`: UNIQUE → `Duplicate`, FOREIGN KEY → `InvalidInput`.
    pub fn from_write(err: sqlx::Error, conflict: impl FnOnce() -> String) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return TodoError::Duplicate(conflict());
            }
            if db_err.is_foreign_key_violation() {
                return TodoError::InvalidInput(conflict());
            }
        }
        TodoError::DatabaseError(err)
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            code: self.to_error_code().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
