//! Requested sort orders
//!
//! Orders keep the client's sequence and allow the same column twice. The
//! rendered form `col dir, col dir` is safe to use as an ORDER BY clause
//! because column names are validated and directions are normalized.

use crate::validation::{validate_column_name, ValidationError};
use crate::wire::scalar_text;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Case-insensitive, anything other than `desc` is ascending
    pub fn parse(direction: &str) -> Self {
        if direction.trim().eq_ignore_ascii_case("desc") {
            Direction::Desc
        } else {
            Direction::Asc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    col: String,
    direction: Direction,
}

impl Order {
    pub fn new(col: &str, direction: Option<&str>) -> Result<Self, ValidationError> {
        Self::with_direction(col, direction.map(Direction::parse).unwrap_or_default())
    }

    pub fn with_direction(col: &str, direction: Direction) -> Result<Self, ValidationError> {
        validate_column_name(col)?;
        Ok(Self {
            col: col.to_string(),
            direction,
        })
    }

    /// Parse `"col"` or `"col dir"`
    pub fn from_string(order: &str) -> Result<Self, ValidationError> {
        let mut parts = order.split_whitespace();
        let col = parts.next().unwrap_or_default();
        Self::new(col, parts.next())
    }

    pub fn col(&self) -> &str {
        &self.col
    }

    pub fn set_col(&mut self, col: &str) -> Result<&mut Self, ValidationError> {
        validate_column_name(col)?;
        self.col = col.to_string();
        Ok(self)
    }

    pub fn direction(&self) -> &'static str {
        self.direction.as_str()
    }

    pub fn sort_direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: &str) -> &mut Self {
        self.direction = Direction::parse(direction);
        self
    }

    pub fn is_desc(&self) -> bool {
        self.direction == Direction::Desc
    }

    pub fn to_associative_array(&self) -> (String, String) {
        (self.col.clone(), self.direction.as_str().to_string())
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.col, self.direction)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Orders {
    items: Vec<Order>,
}

impl Orders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, order: Order) -> &mut Self {
        self.items.push(order);
        self
    }

    pub fn prepend(&mut self, order: Order) -> &mut Self {
        self.items.insert(0, order);
        self
    }

    pub fn has(&self, col: &str) -> bool {
        self.items.iter().any(|order| order.col == col)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.items.clear();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.items.iter()
    }

    /// Ingest `{col: dir}` maps or `"col dir"` strings
    pub fn set_from_json(&mut self, value: &Value) -> Result<&mut Self, ValidationError> {
        match value {
            Value::Object(entries) => self.append_map(entries)?,
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(entries) => self.append_map(entries)?,
                        Value::Array(_) => {}
                        scalar => self.append_text(scalar)?,
                    }
                }
            }
            scalar => self.append_text(scalar)?,
        }
        Ok(self)
    }

    fn append_map(&mut self, entries: &Map<String, Value>) -> Result<(), ValidationError> {
        for (col, direction) in entries {
            self.append(Order::new(col, direction.as_str())?);
        }
        Ok(())
    }

    fn append_text(&mut self, value: &Value) -> Result<(), ValidationError> {
        if let Some(text) = scalar_text(value).filter(|t| !t.trim().is_empty()) {
            self.append(Order::from_string(&text)?);
        }
        Ok(())
    }

    /// `"col dir"` entries in order
    pub fn to_array(&self) -> Vec<String> {
        self.items.iter().map(Order::to_string).collect()
    }

    pub fn to_associative_array(&self) -> Vec<(String, String)> {
        self.items.iter().map(Order::to_associative_array).collect()
    }
}

impl fmt::Display for Orders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_array().join(", "))
    }
}

impl<'a> IntoIterator for &'a Orders {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_string() {
        assert_eq!(Order::from_string("name DESC").unwrap().direction(), "desc");
        assert_eq!(Order::from_string("name FOO").unwrap().direction(), "asc");
        assert_eq!(Order::from_string("name").unwrap().direction(), "asc");

        let padded = Order::from_string("  created_at \t desc ").unwrap();
        assert_eq!(padded.col(), "created_at");
        assert!(padded.is_desc());
    }

    #[test]
    fn test_invalid_column_propagates() {
        assert_eq!(
            Order::from_string("id;drop asc").unwrap_err(),
            ValidationError::InvalidColumnName("id;drop".into())
        );
        assert!(Order::from_string("   ").is_err());
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("DeSc"), Direction::Desc);
        assert_eq!(Direction::parse("ascending"), Direction::Asc);
        assert_eq!(Direction::Desc.to_sql(), "DESC");
    }

    #[test]
    fn test_set_from_json_shapes() {
        let mut orders = Orders::new();
        orders
            .set_from_json(&json!({"name": "desc", "id": null}))
            .unwrap();
        assert_eq!(orders.to_array(), vec!["id asc", "name desc"]);

        orders.clear();
        orders
            .set_from_json(&json!(["title", " ", "created_at DESC", {"score": "asc"}]))
            .unwrap();
        assert_eq!(
            orders.to_array(),
            vec!["title asc", "created_at desc", "score asc"]
        );

        orders.clear();
        orders.set_from_json(&json!("rank desc")).unwrap();
        assert_eq!(orders.to_string(), "rank desc");
    }

    #[test]
    fn test_duplicates_kept_and_rendered() {
        let mut orders = Orders::new();
        orders.append(Order::from_string("a desc").unwrap());
        orders.append(Order::from_string("a").unwrap());
        orders.prepend(Order::from_string("b").unwrap());

        assert_eq!(orders.len(), 3);
        assert!(orders.has("a"));
        assert_eq!(orders.to_string(), "b asc, a desc, a asc");
        assert_eq!(
            orders.to_associative_array()[1],
            ("a".to_string(), "desc".to_string())
        );
    }
}
