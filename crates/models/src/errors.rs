use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("fractal {0} already exists")]
    Duplicate(String),
    #[error("fractal {0} not found")]
    NotFound(String),
    #[error("corrupt fractal document: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Db(String),
}
