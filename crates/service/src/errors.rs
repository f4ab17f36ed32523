use serde::Serialize;
use thiserror::Error;

use models::errors::ModelError;

/// One offending request field, e.g. `parameter.xa: must be a number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {}", summarize(.0))]
    Validation(Vec<FieldError>),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ServiceError {
    pub fn not_found(id: &str) -> Self {
        Self::NotFound(format!("fractal {} not found", id))
    }

    pub fn conflict(id: &str) -> Self {
        Self::Conflict(format!("fractal {} already exists", id))
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Duplicate(id) => ServiceError::conflict(&id),
            ModelError::NotFound(id) => ServiceError::not_found(&id),
            other => ServiceError::Db(other.to_string()),
        }
    }
}
