use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("email already registered")]
    Conflict,
    #[error("database error: {0}")]
    Db(String),
}
