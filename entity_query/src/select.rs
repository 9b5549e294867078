//! Select query builder
//!
//! `SelectQuery` collects AND-ed predicates that reference named
//! placeholders (`:name:`), a raw ORDER BY clause and limit/offset. It
//! renders to named-placeholder SQL for inspection and to positional
//! (`$1`, `$2`, ...) SQL with ordered values for PostgreSQL.

use rows_request::BindMap;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    table: String,
    columns: Vec<String>,
    predicates: Vec<String>,
    binds: BindMap,
    order_by: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQuery {
    pub fn from_table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Explicit column list, `*` when empty
    pub fn set_columns(&mut self, columns: Vec<String>) -> &mut Self {
        self.columns = columns;
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Add a predicate joined with AND, together with its bound values
    pub fn and_where(&mut self, sql: impl Into<String>, binds: BindMap) -> &mut Self {
        self.predicates.push(sql.into());
        self.binds.extend(binds);
        self
    }

    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    pub fn binds(&self) -> &BindMap {
        &self.binds
    }

    /// Raw ORDER BY clause; blank clears it
    pub fn order_by(&mut self, raw: impl Into<String>) -> &mut Self {
        let raw = raw.into();
        self.order_by = if raw.trim().is_empty() { None } else { Some(raw) };
        self
    }

    pub fn order(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn set_limit(&mut self, limit: Option<u64>) -> &mut Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn set_offset(&mut self, offset: Option<u64>) -> &mut Self {
        self.offset = offset.filter(|o| *o > 0);
        self
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    fn where_clause(&self) -> String {
        match self.predicates.as_slice() {
            [] => String::new(),
            [single] => format!(" WHERE {}", single),
            many => {
                let wrapped: Vec<String> = many.iter().map(|p| format!("({})", p)).collect();
                format!(" WHERE {}", wrapped.join(" AND "))
            }
        }
    }

    /// SQL with `:name:` placeholders
    pub fn to_sql(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };

        let mut sql = format!("SELECT {} FROM {}", columns, self.table);
        sql.push_str(&self.where_clause());

        if let Some(order) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
        sql
    }

    /// Row count of the filtered set, ignoring order and paging
    pub fn to_count_sql(&self) -> String {
        format!(
            "SELECT COUNT(*) AS total FROM {}{}",
            self.table,
            self.where_clause()
        )
    }

    /// PostgreSQL form of `to_sql` with ordered values
    pub fn to_positional(&self) -> (String, Vec<Value>) {
        positional(&self.to_sql(), &self.binds)
    }

    /// PostgreSQL form of `to_count_sql` with ordered values
    pub fn to_positional_count(&self) -> (String, Vec<Value>) {
        positional(&self.to_count_sql(), &self.binds)
    }
}

/// Replace `:name:` placeholders known to `binds` with `$n`
fn positional(sql: &str, binds: &BindMap) -> (String, Vec<Value>) {
    let mut out = String::with_capacity(sql.len());
    let mut values = Vec::new();
    let mut numbers: HashMap<&str, usize> = HashMap::new();
    let mut rest = sql;

    while let Some(pos) = rest.find(':') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..name_len];

        let closed = after[name_len..].starts_with(':');
        match binds.get_key_value(name) {
            Some((key, value)) if name_len > 0 && closed => {
                let number = *numbers.entry(key.as_str()).or_insert_with(|| {
                    values.push(value.clone());
                    values.len()
                });
                out.push('$');
                out.push_str(&number.to_string());
                rest = &after[name_len + 1..];
            }
            _ => {
                out.push(':');
                rest = after;
            }
        }
    }
    out.push_str(rest);

    (out, values)
}
