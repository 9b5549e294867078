//! Paginator factory
//!
//! Turns a data source plus the request's pagination into one page of
//! items with totals. Sources can be an in-memory list, a lazy result set
//! or a select query that is counted and fetched through an executor.

use crate::errors::EntityError;
use crate::executor::QueryExecutor;
use crate::select::SelectQuery;
use rows_request::Pagination;
use serde::Serialize;
use serde_json::Value;

pub enum DataSource<R> {
    /// Rows already in memory
    Rows(Vec<R>),
    /// Lazy result set, drained once
    ResultSet(Box<dyn Iterator<Item = R> + Send>),
    /// Query run through the executor
    Builder(SelectQuery),
}

impl<R> std::fmt::Debug for DataSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Rows(rows) => write!(f, "Rows({})", rows.len()),
            DataSource::ResultSet(_) => f.write_str("ResultSet"),
            DataSource::Builder(query) => write!(f, "Builder({})", query.to_sql()),
        }
    }
}

impl DataSource<Value> {
    /// Accept a JSON array of rows
    pub fn from_json(value: Value) -> Result<Self, EntityError> {
        match value {
            Value::Array(rows) => Ok(DataSource::Rows(rows)),
            other => Err(EntityError::UnsupportedSource(format!(
                "expected an array of rows, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One page of items with totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<R> {
    pub items: Vec<R>,
    pub total_count: u64,
    pub current_page: u64,
    pub page_count: u64,
    pub per_page: u64,
}

impl<R> PageResult<R> {
    fn new(items: Vec<R>, total_count: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total_count,
            current_page: pagination.page(),
            page_count: pagination.page_count(total_count),
            per_page: pagination.per_page(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.page_count
    }
}

pub struct Paginator;

impl Paginator {
    /// Build the page described by `pagination` from `source`
    pub async fn create<E>(
        source: DataSource<E::Row>,
        pagination: &Pagination,
        executor: &E,
    ) -> Result<PageResult<E::Row>, EntityError>
    where
        E: QueryExecutor,
    {
        match source {
            DataSource::Rows(rows) => Ok(Self::slice(rows, pagination)),
            DataSource::ResultSet(rows) => Ok(Self::slice(rows.collect(), pagination)),
            DataSource::Builder(query) => {
                let total = executor.count(&query).await?;
                Self::from_query(query, total, pagination, executor).await
            }
        }
    }

    /// Page of a query whose filtered row count is already known
    pub async fn from_query<E>(
        mut query: SelectQuery,
        total: u64,
        pagination: &Pagination,
        executor: &E,
    ) -> Result<PageResult<E::Row>, EntityError>
    where
        E: QueryExecutor,
    {
        query
            .set_limit(pagination.limit())
            .set_offset(Some(pagination.offset()));
        let items = executor.fetch(&query).await?;
        tracing::debug!(total, page = pagination.page(), "paginated query");
        Ok(PageResult::new(items, total, pagination))
    }

    /// Page of an in-memory list
    pub fn from_rows<R>(rows: Vec<R>, pagination: &Pagination) -> PageResult<R> {
        Self::slice(rows, pagination)
    }

    fn slice<R>(rows: Vec<R>, pagination: &Pagination) -> PageResult<R> {
        let total = rows.len() as u64;
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let page: Vec<R> = match pagination.limit() {
            Some(limit) => rows
                .into_iter()
                .skip(offset)
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect(),
            None => rows.into_iter().skip(offset).collect(),
        };
        PageResult::new(page, total, pagination)
    }
}
