//! Rows Request - request model for paged, sorted and filtered table views
//!
//! This crate provides the types that turn a client's table request into
//! validated columns, filters, orders and pagination, the bound-value
//! wrapper used to render them as parameterized SQL, and the pluggable
//! storage that keeps request state between calls.

pub mod column;
pub mod errors;
pub mod filter;
pub mod order;
pub mod pagination;
pub mod prelude;
pub mod request;
pub mod storage;
pub mod validation;
pub mod value;
pub(crate) mod wire;


pub use column::{Column, Columns};
pub use errors::RequestError;
pub use filter::{Filter, Filters};
pub use order::{Direction, Order, Orders};
pub use pagination::Pagination;
pub use request::RowsRequest;
pub use storage::{BlackHoleStorage, SessionStorage, Storage};
pub use validation::ValidationError;
pub use value::{BindMap, DbValue, Expr, Operand};

// Re-export centralized config
pub use config::{RequestConfig, StorageConfig};
