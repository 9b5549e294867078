//! Requested columns
//!
//! A column is a validated name with an optional display header. `Columns`
//! keeps them in request order.

use crate::validation::{validate_column_name, ValidationError};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    header: Option<String>,
}

impl Column {
    pub fn new(name: &str, header: Option<&str>) -> Result<Self, ValidationError> {
        validate_column_name(name)?;
        Ok(Self {
            name: name.to_string(),
            header: header.map(str::to_string),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<&mut Self, ValidationError> {
        validate_column_name(name)?;
        self.name = name.to_string();
        Ok(self)
    }

    /// Explicit header, or the name made readable
    pub fn header(&self) -> String {
        match &self.header {
            Some(header) => header.clone(),
            None => friendly_name(&self.name),
        }
    }

    pub fn set_header(&mut self, header: Option<&str>) -> &mut Self {
        self.header = header.map(str::to_string);
        self
    }
}

/// `first_name` -> `First Name`
pub fn friendly_name(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut result = String::with_capacity(spaced.len());
    let mut word_start = true;

    for c in spaced.chars() {
        if word_start {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        word_start = c.is_whitespace();
    }

    result
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    items: Vec<Column>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, column: Column) -> &mut Self {
        self.items.push(column);
        self
    }

    pub fn prepend(&mut self, column: Column) -> &mut Self {
        self.items.insert(0, column);
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.items.iter().any(|column| column.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.items.iter().find(|column| column.name == name)
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

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.items.iter()
    }

    /// Ingest a list of names or a `{name: header}` object
    pub fn set_from_json(&mut self, value: &Value) -> Result<&mut Self, ValidationError> {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Value::String(name) = item {
                        self.append(Column::new(name, None)?);
                    }
                }
            }
            Value::Object(entries) => {
                for (name, header) in entries {
                    match header {
                        Value::String(header) => {
                            self.append(Column::new(name, Some(header))?);
                        }
                        Value::Null => {
                            self.append(Column::new(name, None)?);
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        Ok(self)
    }

    /// Column names in order
    pub fn to_array(&self) -> Vec<String> {
        self.items.iter().map(|column| column.name.clone()).collect()
    }

    /// Name to header pairs in order
    pub fn to_associative_array(&self) -> Vec<(String, String)> {
        self.items
            .iter()
            .map(|column| (column.name.clone(), column.header()))
            .collect()
    }

    /// Name to header map
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, header) in self.to_associative_array() {
            map.insert(name, Value::String(header));
        }
        Value::Object(map)
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_defaults_to_friendly_name() {
        let column = Column::new("first_name", None).unwrap();
        assert_eq!(column.header(), "First Name");

        let labelled = Column::new("dob", Some("Date of birth")).unwrap();
        assert_eq!(labelled.header(), "Date of birth");
    }

    #[test]
    fn test_friendly_name() {
        assert_eq!(friendly_name("created_at"), "Created At");
        assert_eq!(friendly_name("users.email"), "Users.email");
        assert_eq!(friendly_name("id"), "Id");
    }

    #[test]
    fn test_invalid_name_rejected() {
        assert!(Column::new("name desc", None).is_err());
        assert!(Column::new("", None).is_err());

        let mut column = Column::new("ok", None).unwrap();
        assert!(column.set_name("bad;").is_err());
        assert_eq!(column.name(), "ok");
    }

    #[test]
    fn test_set_from_json_list_and_object() {
        let mut columns = Columns::new();
        columns
            .set_from_json(&json!(["id", "title", 5, null]))
            .unwrap();
        assert_eq!(columns.to_array(), vec!["id", "title"]);

        columns.clear();
        columns
            .set_from_json(&json!({"title": "Headline", "author_name": null, "x": 1}))
            .unwrap();
        assert_eq!(
            columns.to_associative_array(),
            vec![
                ("author_name".to_string(), "Author Name".to_string()),
                ("title".to_string(), "Headline".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_from_json_propagates_errors() {
        let mut columns = Columns::new();
        let err = columns.set_from_json(&json!(["id", "1=1;--"])).unwrap_err();
        assert_eq!(err, ValidationError::InvalidColumnName("1=1;--".into()));
    }

    #[test]
    fn test_prepend_and_has() {
        let mut columns = Columns::new();
        columns.append(Column::new("b", None).unwrap());
        columns.prepend(Column::new("a", None).unwrap());

        assert_eq!(columns.to_array(), vec!["a", "b"]);
        assert!(columns.has("b"));
        assert!(!columns.has("c"));
        assert_eq!(columns.len(), 2);
    }
}
