//! # GridQuery
//!
//! Paged, sorted and filtered table listings for PostgreSQL. A client's
//! table request becomes a validated `RowsRequest`, an entity's hook
//! pipeline turns it into a parameterized query, and the paginator returns
//! one page of rows with totals.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridquery::prelude::*;
//! use serde_json::json;
//!
//! #[derive(Debug, Default, TableSchema)]
//! #[table(name = "articles")]
//! pub struct Article {
//!     #[primary_key]
//!     pub id: i64,
//!     pub title: String,
//!     pub status: String,
//! }
//!
//! impl Entity for Article {}
//!
//! #[derive(Debug, sqlx::FromRow)]
//! pub struct ArticleRow {
//!     pub id: i64,
//!     pub title: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let grid = GridQuery::connect(&config).await?;
//!
//!     let mut request = grid.request_for_session("articles", "session-id")?;
//!     if let serde_json::Value::Object(input) = json!({"start": 0, "length": 20, "f": {"status": "live"}}) {
//!         request.set_from_array(input)?;
//!     }
//!
//!     let executor = grid.executor::<ArticleRow>()?;
//!     let page = Article::default().paginator(&mut request, &executor).await?;
//!     println!("{} of {} rows", page.items.len(), page.total_count);
//!
//!     request.save()?;
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::GridQuery;
pub use crate::errors::GridQueryError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, RequestConfig, SessionConfig, StorageConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated derive code to work correctly
pub use entity_derive;
pub use entity_query;
pub use rows_request;
pub use session_store;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
