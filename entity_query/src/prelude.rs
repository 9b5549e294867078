//! Prelude module for entity query
//!
//! This module re-exports the most commonly used types.

pub use crate::entity::Entity;
pub use crate::errors::EntityError;
pub use crate::executor::{PgExecutor, QueryExecutor};
pub use crate::paginator::{DataSource, PageResult, Paginator};
pub use crate::sanitize::{Sanitizer, DEFAULT_SANITIZERS};
pub use crate::schema::{schema_of, Schema, TableSchema};
pub use crate::select::SelectQuery;
pub use entity_derive::TableSchema;
