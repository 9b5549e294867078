//! Validation module
//!
//! This module provides the name grammars accepted for columns, orders and
//! filters. Anything outside the grammar is rejected before it can reach a
//! query.

use std::fmt;

/// Validation errors for client-supplied names
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Column or order name outside `[.A-Za-z0-9_]+`
    InvalidColumnName(String),
    /// Filter name outside `[A-Za-z0-9_]+`
    InvalidFilterName(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidColumnName(name) => {
                write!(
                    f,
                    "Invalid column name '{}': only letters, digits, underscores and dots are allowed",
                    name
                )
            }
            ValidationError::InvalidFilterName(name) => {
                write!(
                    f,
                    "Invalid filter name '{}': only letters, digits and underscores are allowed",
                    name
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a column name, also used for order columns
pub fn validate_column_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || !name.chars().all(is_column_char) {
        return Err(ValidationError::InvalidColumnName(name.to_string()));
    }
    Ok(())
}

/// Validate a filter name
pub fn validate_filter_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || !name.chars().all(is_filter_char) {
        return Err(ValidationError::InvalidFilterName(name.to_string()));
    }
    Ok(())
}

fn is_filter_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_column_char(c: char) -> bool {
    is_filter_char(c) || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_column_names() {
        assert!(validate_column_name("title").is_ok());
        assert!(validate_column_name("users.email").is_ok());
        assert!(validate_column_name("_id2").is_ok());
        assert!(validate_column_name("2024").is_ok());
    }

    #[test]
    fn test_invalid_column_names() {
        assert_eq!(
            validate_column_name(""),
            Err(ValidationError::InvalidColumnName(String::new()))
        );
        assert!(validate_column_name("name;drop").is_err());
        assert!(validate_column_name("first name").is_err());
        assert!(validate_column_name("naïve").is_err());
    }

    #[test]
    fn test_filter_names_reject_dots() {
        assert!(validate_filter_name("status").is_ok());
        assert_eq!(
            validate_filter_name("users.status"),
            Err(ValidationError::InvalidFilterName("users.status".into()))
        );
        assert!(validate_filter_name("").is_err());
    }
}
