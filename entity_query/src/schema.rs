//! Table schemas and the per-type schema registry
//!
//! Every entity type describes its table once. Descriptions are memoized in
//! a process-wide registry keyed by `TypeId`; the first lookup for a type
//! populates its entry while holding the registry lock, so concurrent first
//! lookups describe the type only once.

use crate::errors::EntityError;
use crate::sanitize::Sanitizer;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Table name, primary key and column list of an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    table: String,
    primary: Option<String>,
    columns: Vec<String>,
}

impl Schema {
    pub fn new(table: &str, primary: Option<&str>, columns: &[&str]) -> Self {
        Self {
            table: table.to_string(),
            primary: primary.map(str::to_string),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Columns qualified with the table name
    pub fn columns_full(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| format!("{}.{}", self.table, c))
            .collect()
    }

    pub fn validate(&self) -> Result<(), EntityError> {
        if self.table.is_empty() {
            return Err(EntityError::Schema("table name cannot be empty".into()));
        }
        if let Some(primary) = &self.primary {
            if !self.has_column(primary) {
                return Err(EntityError::Schema(format!(
                    "primary key '{}' is not a column of '{}'",
                    primary, self.table
                )));
            }
        }
        Ok(())
    }
}

/// Static description of an entity's table
///
/// Usually derived with `#[derive(TableSchema)]`.
pub trait TableSchema: Send + Sync + 'static {
    fn table_name() -> &'static str;

    fn describe() -> Schema;

    /// Per-field sanitizer chains replacing the default chain
    fn input_sanitizers() -> Vec<(&'static str, Vec<Sanitizer>)> {
        Vec::new()
    }

    /// Fields passed through input filtering untouched
    fn skip_sanitize_fields() -> &'static [&'static str] {
        &[]
    }
}

type Registry = Mutex<HashMap<TypeId, Arc<Schema>>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Memoized schema of `T`
pub fn schema_of<T: TableSchema>() -> Arc<Schema> {
    let mut schemas = registry().lock().unwrap_or_else(PoisonError::into_inner);
    let schema = schemas.entry(TypeId::of::<T>()).or_insert_with(|| {
        tracing::debug!(table = T::table_name(), "describing table schema");
        Arc::new(T::describe())
    });
    Arc::clone(schema)
}
