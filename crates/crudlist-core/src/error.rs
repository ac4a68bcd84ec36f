//! Error types for crudlist

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Record not found: {0}")]
    NotFound(u64),

    #[error("Duplicate record ID: {0}")]
    DuplicateId(u64),

    #[error("No record IDs left")]
    IdsExhausted,

    #[error("Invalid record ID: {0}")]
    InvalidId(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Invalid seed data: {0}")]
    Seed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
