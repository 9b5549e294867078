//! Query execution
//!
//! `QueryExecutor` is the seam between the listing pipeline and a database.
//! `PgExecutor` runs queries on a PostgreSQL pool, mapping rows with
//! `sqlx::FromRow`.

use crate::errors::EntityError;
use crate::select::SelectQuery;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::marker::PhantomData;

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    type Row: Send;

    /// Rows selected by the query, honoring its limit and offset
    async fn fetch(&self, query: &SelectQuery) -> Result<Vec<Self::Row>, EntityError>;

    /// Size of the filtered set, ignoring limit and offset
    async fn count(&self, query: &SelectQuery) -> Result<u64, EntityError>;
}

// Binds one listing parameter. Text that reads as a timestamp or UUID is
// bound with that type so comparisons against typed columns work; lists and
// objects go in as JSONB.
macro_rules! bind_json_param {
    ($query:expr, $param:expr) => {
        match $param {
            serde_json::Value::Null => $query.bind(Option::<String>::None),
            serde_json::Value::Bool(b) => $query.bind(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => match i32::try_from(i) {
                    Ok(small) => $query.bind(small),
                    Err(_) => $query.bind(i),
                },
                (None, Some(f)) => $query.bind(f),
                (None, None) => $query.bind(n.to_string()),
            },
            serde_json::Value::String(s) => {
                if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                    $query.bind(dt.with_timezone(&chrono::Utc))
                } else if let Ok(uuid) = uuid::Uuid::parse_str(&s) {
                    $query.bind(uuid)
                } else {
                    $query.bind(s)
                }
            }
            nested => $query.bind(sqlx::types::Json(nested)),
        }
    };
}

/// PostgreSQL executor producing rows of type `T`
pub struct PgExecutor<T> {
    pool: PgPool,
    _row: PhantomData<fn() -> T>,
}

impl<T> Clone for PgExecutor<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _row: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for PgExecutor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgExecutor")
            .field("row", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> PgExecutor<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _row: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl<T> QueryExecutor for PgExecutor<T>
where
    T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin + 'static,
{
    type Row = T;

    async fn fetch(&self, query: &SelectQuery) -> Result<Vec<T>, EntityError> {
        let (sql, params) = query.to_positional();
        tracing::debug!(sql = %sql, params = params.len(), "fetching rows");

        let mut sqlx_query = sqlx::query_as::<_, T>(&sql);
        for param in params {
            sqlx_query = bind_json_param!(sqlx_query, param);
        }

        Ok(sqlx_query.fetch_all(&self.pool).await?)
    }

    async fn count(&self, query: &SelectQuery) -> Result<u64, EntityError> {
        let (sql, params) = query.to_positional_count();
        tracing::debug!(sql = %sql, params = params.len(), "counting rows");

        let mut sqlx_query = sqlx::query(&sql);
        for param in params {
            sqlx_query = bind_json_param!(sqlx_query, param);
        }

        let row = sqlx_query.fetch_one(&self.pool).await?;
        let total: i64 = row.try_get("total")?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sqlx::Execute;

    #[test]
    fn test_every_value_kind_binds() {
        let sql = "SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9";
        let values = vec![
            json!(null),
            json!(true),
            json!(7),
            json!(9_000_000_000i64),
            json!(1.5),
            json!("2024-01-02T03:04:05Z"),
            json!("6f1c1a5e-2b0a-4d4e-9c53-3f1d2b9e8a10"),
            json!("plain"),
            json!({"tags": [1, 2]}),
        ];

        let mut query = sqlx::query::<sqlx::Postgres>(sql);
        for value in values {
            query = bind_json_param!(query, value);
        }
        assert_eq!(query.sql(), sql);
    }
}
