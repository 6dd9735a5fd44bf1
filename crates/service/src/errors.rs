use thiserror::Error;

use crate::news::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    ValidationFailed(FieldErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("empty collection: {0}")]
    EmptyCollection(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn empty(entity: &str) -> Self { Self::EmptyCollection(format!("no {} stored", entity)) }
}
