//! Prelude module for rows request
//!
//! This module re-exports the most commonly used types.

pub use crate::column::{Column, Columns};
pub use crate::errors::RequestError;
pub use crate::filter::{Filter, Filters};
pub use crate::order::{Direction, Order, Orders};
pub use crate::pagination::{Pagination, PER_PAGE_DEFAULT};
pub use crate::request::RowsRequest;
pub use crate::storage::{resolve as resolve_storage, BlackHoleStorage, SessionStorage, Storage};
pub use crate::validation::ValidationError;
pub use crate::value::{BindMap, DbValue, Expr, Operand};
pub use config::{RequestConfig, StorageConfig};
