//! Request filters
//!
//! A filter pairs a column with a raw client value. Empty filters are
//! ignored on every read path, so a cleared search box never narrows the
//! result set.

use crate::errors::RequestError;
use crate::validation::{validate_filter_name, ValidationError};
use crate::value::DbValue;
use crate::wire::scalar_text;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    col: String,
    value: Value,
}

impl Filter {
    pub fn new(col: &str, value: impl Into<Value>) -> Result<Self, ValidationError> {
        validate_filter_name(col)?;
        Ok(Self {
            col: col.to_string(),
            value: value.into(),
        })
    }

    pub fn col(&self) -> &str {
        &self.col
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.value = value.into();
        self
    }

    /// Null, blank text, or a list whose every element is blank
    pub fn is_empty(&self) -> bool {
        match &self.value {
            Value::Array(items) => items.iter().all(is_blank),
            Value::Object(entries) => entries.values().all(is_blank),
            scalar => is_blank(scalar),
        }
    }

    /// The value as a list; text is split on `,`
    pub fn to_array(&self) -> Vec<Value> {
        match &self.value {
            Value::Null => Vec::new(),
            Value::Array(items) => items.clone(),
            Value::Object(entries) => entries.values().cloned().collect(),
            Value::String(text) => text
                .split(',')
                .map(|part| Value::String(part.to_string()))
                .collect(),
            scalar => vec![scalar.clone()],
        }
    }

    /// Bound value for the filter, a list when it holds several elements
    ///
    /// Elements must be scalars; nested lists and objects cannot be bound.
    pub fn to_db_value(&self) -> Result<DbValue, RequestError> {
        if self.is_empty() {
            return Ok(DbValue::new());
        }

        let mut items = self.to_array();
        if let Some(nested) = items.iter().find(|item| item.is_array() || item.is_object()) {
            return Err(RequestError::UnsupportedBindTarget(format!(
                "nested value {} in filter `{}`",
                nested, self.col
            )));
        }

        if items.len() == 1 {
            Ok(DbValue::scalar(items.remove(0)))
        } else {
            Ok(DbValue::list(items))
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match scalar_text(value) {
        Some(text) => text.trim().is_empty(),
        None => false,
    }
}

/// Filters keyed by column, at most one per column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    items: Vec<Filter>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, replacing any filter on the same column in place
    pub fn add(&mut self, filter: Filter) -> &mut Self {
        if filter.is_empty() {
            return self;
        }

        match self.items.iter_mut().find(|f| f.col == filter.col) {
            Some(existing) => *existing = filter,
            None => self.items.push(filter),
        }
        self
    }

    pub fn remove(&mut self, col: &str) -> &mut Self {
        self.items.retain(|f| f.col != col);
        self
    }

    /// Non-empty filter on `col`
    pub fn get(&self, col: &str) -> Option<&Filter> {
        self.iter().find(|f| f.col == col)
    }

    pub fn get_mut(&mut self, col: &str) -> Option<&mut Filter> {
        self.items.iter_mut().find(|f| f.col == col)
    }

    pub fn has(&self, col: &str) -> bool {
        self.get(col).is_some()
    }

    pub fn clear(&mut self) -> &mut Self {
        self.items.clear();
        self
    }

    /// Drop filters whose value became empty after they were added
    pub fn remove_empty(&mut self) -> &mut Self {
        self.items.retain(|f| !f.is_empty());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Non-empty filters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Filter> + '_ {
        self.items.iter().filter(|f| !f.is_empty())
    }

    pub fn to_array(&self) -> Map<String, Value> {
        self.iter()
            .map(|f| (f.col.clone(), f.value.clone()))
            .collect()
    }

    /// Ingest a `{col: value}` map; blank keys are skipped
    pub fn set_from_array(
        &mut self,
        data: &Map<String, Value>,
        clear_first: bool,
    ) -> Result<&mut Self, ValidationError> {
        if clear_first {
            self.clear();
        }

        for (col, value) in data {
            if col.is_empty() {
                continue;
            }
            self.add(Filter::new(col, value.clone())?);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_emptiness() {
        assert!(Filter::new("a", "").unwrap().is_empty());
        assert!(Filter::new("a", "   ").unwrap().is_empty());
        assert!(Filter::new("a", vec![" ", ""]).unwrap().is_empty());
        assert!(Filter::new("a", Value::Null).unwrap().is_empty());
        assert!(Filter::new("a", json!([])).unwrap().is_empty());

        assert!(!Filter::new("a", "0").unwrap().is_empty());
        assert!(!Filter::new("a", 0).unwrap().is_empty());
        assert!(!Filter::new("a", vec!["", "x"]).unwrap().is_empty());
    }

    #[test]
    fn test_name_grammar() {
        assert!(Filter::new("status_id", 1).is_ok());
        assert_eq!(
            Filter::new("a.b", 1).unwrap_err(),
            ValidationError::InvalidFilterName("a.b".into())
        );
        assert!(Filter::new("", 1).is_err());
    }

    #[test]
    fn test_to_array_splits_text_only() {
        assert_eq!(
            Filter::new("tag", "a,b").unwrap().to_array(),
            vec![json!("a"), json!("b")]
        );
        assert_eq!(Filter::new("n", 7).unwrap().to_array(), vec![json!(7)]);
        assert_eq!(
            Filter::new("n", json!([1, 2])).unwrap().to_array(),
            vec![json!(1), json!(2)]
        );
    }

    #[test]
    fn test_to_db_value() {
        let single = Filter::new("status", "active").unwrap().to_db_value().unwrap();
        assert!(!single.is_list());
        assert!(single.has(&json!("active"), true));

        let several = Filter::new("status", "a,b,c").unwrap().to_db_value().unwrap();
        assert!(several.is_list());
        assert_eq!(several.count(), 3);

        let empty = Filter::new("status", " ").unwrap().to_db_value().unwrap();
        assert!(!empty.is_value_set());
    }

    #[test]
    fn test_nested_elements_cannot_be_bound() {
        let nested = Filter::new("tags", json!([[1, 2], "x"])).unwrap();
        assert!(matches!(
            nested.to_db_value(),
            Err(RequestError::UnsupportedBindTarget(_))
        ));

        let object = Filter::new("tags", json!({"a": {"b": 1}})).unwrap();
        assert!(matches!(
            object.to_db_value(),
            Err(RequestError::UnsupportedBindTarget(_))
        ));

        let flat = Filter::new("tags", json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(flat.to_db_value().unwrap().bind().len(), 2);
    }

    #[test]
    fn test_later_filter_replaces_earlier() {
        let mut filters = Filters::new();
        filters.add(Filter::new("x", 1).unwrap());
        filters.add(Filter::new("y", 5).unwrap());
        filters.add(Filter::new("x", 2).unwrap());

        assert_eq!(filters.len(), 2);
        assert_eq!(filters.get("x").unwrap().value(), &json!(2));
        let order: Vec<&str> = filters.iter().map(|f| f.col()).collect();
        assert_eq!(order, vec!["x", "y"]);
    }

    #[test]
    fn test_adding_empty_filter_is_noop() {
        let mut filters = Filters::new();
        filters.add(Filter::new("x", 1).unwrap());
        filters.add(Filter::new("x", "").unwrap());

        assert_eq!(filters.get("x").unwrap().value(), &json!(1));
    }

    #[test]
    fn test_remove_empty_after_mutation() {
        let mut filters = Filters::new();
        filters.add(Filter::new("q", "text").unwrap());
        filters.get_mut("q").unwrap().set_value("");

        // read paths skip it without pruning
        assert!(filters.is_empty());
        assert!(!filters.has("q"));
        assert!(filters.get_mut("q").is_some());

        filters.remove_empty();
        assert!(filters.get_mut("q").is_none());
    }

    #[test]
    fn test_set_from_array() {
        let mut filters = Filters::new();
        filters.add(Filter::new("old", 1).unwrap());

        let data = json!({"status": "a,b", "q": "", "": "skip"});
        filters
            .set_from_array(data.as_object().unwrap(), true)
            .unwrap();

        assert!(!filters.has("old"));
        assert_eq!(filters.to_array(), *json!({"status": "a,b"}).as_object().unwrap());

        let bad = json!({"a;b": 1});
        assert!(filters.set_from_array(bad.as_object().unwrap(), false).is_err());
    }
}
