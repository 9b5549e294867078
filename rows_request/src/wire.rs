//! Helpers for reading loosely typed wire values

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Remove `key` from the input, treating an explicit null as absent
pub(crate) fn take_present(input: &mut Map<String, Value>, key: &str) -> Option<Value> {
    input.remove(key).filter(|value| !value.is_null())
}

/// Integer view of a number or numeric string
pub(crate) fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}

/// Text form of a scalar; `None` for arrays and objects
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Non-empty string form of a scalar
pub(crate) fn non_empty_text(value: Option<&Value>) -> Option<String> {
    value.and_then(scalar_text).filter(|s| !s.is_empty())
}

/// Index a list given either as an array or as an object keyed by position
pub(crate) fn indexed(value: Value) -> BTreeMap<usize, Value> {
    match value {
        Value::Array(items) => items.into_iter().enumerate().collect(),
        Value::Object(entries) => entries
            .into_iter()
            .filter_map(|(key, item)| key.trim().parse::<usize>().ok().map(|idx| (idx, item)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_int() {
        assert_eq!(as_int(&json!(25)), Some(25));
        assert_eq!(as_int(&json!("40")), Some(40));
        assert_eq!(as_int(&json!(" -1 ")), Some(-1));
        assert_eq!(as_int(&json!(2.9)), Some(2));
        assert_eq!(as_int(&json!("abc")), None);
        assert_eq!(as_int(&json!(true)), None);
        assert_eq!(as_int(&json!(null)), None);
    }

    #[test]
    fn test_indexed_object_keeps_numeric_order() {
        let items = indexed(json!({"10": "k", "2": "c", "x": "skip"}));
        let keys: Vec<usize> = items.keys().copied().collect();
        assert_eq!(keys, vec![2, 10]);
    }
}
