//! Error types for the GridQuery crate
//!
//! This module contains all error types that can be returned by GridQuery operations.

use config::ConfigError;
use entity_query::EntityError;
use rows_request::RequestError;
use session_store::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridQueryError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Database is not connected")]
    DatabaseNotConnected,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rows request error: {0}")]
    Request(#[from] RequestError),

    #[error("Entity query error: {0}")]
    Entity(#[from] EntityError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Session store is not configured")]
    SessionNotConfigured,

    #[error("Request profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Request profile already registered: {0}")]
    ProfileAlreadyRegistered(String),
}
