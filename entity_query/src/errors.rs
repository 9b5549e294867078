use rows_request::RequestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EntityError {
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unsupported data source: {0}")]
    UnsupportedSource(String),

    #[error("Schema error: {0}")]
    Schema(String),
}
