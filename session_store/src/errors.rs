//! Error types for session operations
//!
//! This module defines all error types that can occur
//! during session reads, writes and Redis interactions.

use thiserror::Error;

/// Session store errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Redis connection error: {0}")]
    ConnectionError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Session lock poisoned: {0}")]
    Lock(String),

    #[error("General session error: {0}")]
    General(String),
}
