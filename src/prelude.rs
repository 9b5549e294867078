//! Convenience re-exports for common GridQuery usage
//!
//! This prelude module re-exports the most commonly used items from the GridQuery crates,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use gridquery::prelude::*;
//!
//! let request = RowsRequest::ephemeral();
//! assert_eq!(request.pagination().per_page(), 10);
//! ```

// Core GridQuery components
pub use crate::core::GridQuery;
pub use crate::errors::GridQueryError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, RequestConfig, SessionConfig, StorageConfig};

// Request model, bound values and storage
pub use rows_request::prelude::*;

// Session stores
pub use session_store::prelude::*;

// Entity pipeline, including the TableSchema derive
pub use entity_query::prelude::*;

// Re-export crates the derive-generated code refers to
pub use entity_query;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;

// Commonly used sqlx types
pub use sqlx::{FromRow, PgPool, Row};
