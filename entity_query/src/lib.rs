//! Entity Query - listing pipeline from rows requests to paged results
//!
//! This crate provides the `Entity` trait, whose hooks translate a
//! `RowsRequest` into a parameterized `SelectQuery`, and the paginator that
//! turns a query, an in-memory list or a lazy result set into a uniform
//! `PageResult`.

// Lets the derive's `::entity_query::` paths resolve inside this crate too
extern crate self as entity_query;

pub mod entity;
pub mod errors;
pub mod executor;
pub mod paginator;
pub mod prelude;
pub mod sanitize;
pub mod schema;
pub mod select;

pub use entity::Entity;
pub use entity_derive::TableSchema;
pub use errors::EntityError;
pub use executor::{PgExecutor, QueryExecutor};
pub use paginator::{DataSource, PageResult, Paginator};
pub use sanitize::{sanitize, Sanitizer, DEFAULT_SANITIZERS};
pub use schema::{schema_of, Schema, TableSchema};
pub use select::SelectQuery;
