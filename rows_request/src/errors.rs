use crate::validation::ValidationError;
use session_store::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid column name: {0}")]
    InvalidColumnName(String),

    #[error("Invalid filter name: {0}")]
    InvalidFilterName(String),

    #[error("Unknown storage adapter: {0}")]
    UnknownStorageAdapter(String),

    #[error("Storage adapter '{0}' requires a session store but none was provided")]
    MissingSessionStore(String),

    #[error("Unsupported bind target: {0}")]
    UnsupportedBindTarget(String),

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ValidationError> for RequestError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidColumnName(name) => RequestError::InvalidColumnName(name),
            ValidationError::InvalidFilterName(name) => RequestError::InvalidFilterName(name),
        }
    }
}
