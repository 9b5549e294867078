//! Bound values
//!
//! This module provides `DbValue`, a scalar or list that reaches the
//! database only as named parameters, and `Expr`, a raw SQL fragment that
//! is rendered verbatim wherever it appears inside a `DbValue`.
//!
//! Placeholders have the form `:<id><index>:`. The id is random per value so
//! several values can be combined in one statement without their bind names
//! colliding.

use crate::errors::RequestError;
use crate::wire::scalar_text;
use rand::rngs::OsRng;
use rand::{Rng, TryRngCore};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Bind name to scalar value
pub type BindMap = BTreeMap<String, JsonValue>;

/// Raw SQL fragment, never parameterized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr(String);

impl Expr {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One element of a `DbValue`
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Bound(JsonValue),
    Raw(Expr),
}

impl Operand {
    fn matches(&self, value: &JsonValue, strict: bool) -> bool {
        match self {
            Operand::Bound(held) if strict => held == value,
            Operand::Bound(held) => match (scalar_text(held), scalar_text(value)) {
                (Some(a), Some(b)) => a == b,
                _ => held == value,
            },
            Operand::Raw(_) => false,
        }
    }
}

impl From<JsonValue> for Operand {
    fn from(value: JsonValue) -> Self {
        Operand::Bound(value)
    }
}

impl From<Expr> for Operand {
    fn from(expr: Expr) -> Self {
        Operand::Raw(expr)
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Bound(JsonValue::from(value))
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Operand::Bound(JsonValue::from(value))
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Bound(JsonValue::from(value))
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Operand::Bound(JsonValue::from(value))
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Bound(JsonValue::from(value))
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Operand::Bound(JsonValue::from(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Held {
    Scalar(Operand),
    List(Vec<Operand>),
}

// An unset value renders like a scalar NULL
static NULL_OPERAND: Operand = Operand::Bound(JsonValue::Null);

/// Scalar or list value bound into a query by name
#[derive(Debug, Default)]
pub struct DbValue {
    held: Option<Held>,
    id: OnceLock<String>,
}

impl Clone for DbValue {
    /// The clone gets its own id
    fn clone(&self) -> Self {
        Self {
            held: self.held.clone(),
            id: OnceLock::new(),
        }
    }
}

impl DbValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar(value: impl Into<Operand>) -> Self {
        let mut db_value = Self::new();
        db_value.set(value);
        db_value
    }

    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        let mut db_value = Self::new();
        db_value.set_list(values);
        db_value
    }

    /// Build from a JSON value: null is unset, an array is a list of scalars
    pub fn from_json(value: JsonValue) -> Result<Self, RequestError> {
        match value {
            JsonValue::Null => Ok(Self::new()),
            JsonValue::Array(items) => {
                if let Some(nested) = items
                    .iter()
                    .find(|item| item.is_array() || item.is_object())
                {
                    return Err(RequestError::UnsupportedBindTarget(format!(
                        "nested value {} inside a list",
                        nested
                    )));
                }
                Ok(Self::list(items))
            }
            JsonValue::Object(_) => Err(RequestError::UnsupportedBindTarget(
                "objects cannot be bound".to_string(),
            )),
            scalar => Ok(Self::scalar(scalar)),
        }
    }

    /// Replace the held value with a scalar
    pub fn set(&mut self, value: impl Into<Operand>) -> &mut Self {
        self.held = Some(Held::Scalar(value.into()));
        self
    }

    /// Replace the held value with a list
    pub fn set_list<I, T>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Operand>,
    {
        self.held = Some(Held::List(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Append to the list, promoting a scalar to a one-element list first
    pub fn add(&mut self, value: impl Into<Operand>) -> &mut Self {
        let value = value.into();
        self.held = Some(match self.held.take() {
            None => Held::List(vec![value]),
            Some(Held::Scalar(first)) => Held::List(vec![first, value]),
            Some(Held::List(mut items)) => {
                items.push(value);
                Held::List(items)
            }
        });
        self
    }

    pub fn unset(&mut self) -> &mut Self {
        self.held = None;
        self
    }

    pub fn is_value_set(&self) -> bool {
        self.held.is_some()
    }

    pub fn is_list(&self) -> bool {
        matches!(self.held, Some(Held::List(_)))
    }

    /// Equality for scalars, membership for lists
    pub fn has(&self, value: &JsonValue, strict: bool) -> bool {
        match &self.held {
            None => false,
            Some(Held::Scalar(op)) => op.matches(value, strict),
            Some(Held::List(items)) => items.iter().any(|op| op.matches(value, strict)),
        }
    }

    pub fn count(&self) -> usize {
        match &self.held {
            None => 0,
            Some(Held::Scalar(_)) => 1,
            Some(Held::List(items)) => items.len(),
        }
    }

    pub fn id(&self) -> &str {
        self.id.get_or_init(generate_id)
    }

    fn operands(&self) -> Vec<&Operand> {
        match &self.held {
            None => vec![&NULL_OPERAND],
            Some(Held::Scalar(op)) => vec![op],
            Some(Held::List(items)) => items.iter().collect(),
        }
    }

    fn bind_name(&self, index: usize) -> String {
        format!("{}{}", self.id(), index)
    }

    fn rendered(&self) -> Vec<String> {
        self.operands()
            .into_iter()
            .enumerate()
            .map(|(index, op)| match op {
                Operand::Raw(expr) => expr.to_string(),
                Operand::Bound(_) => format!(":{}:", self.bind_name(index)),
            })
            .collect()
    }

    /// Placeholder list joined by `glue`
    pub fn get_prepared(&self, glue: &str) -> String {
        self.rendered().join(glue)
    }

    /// Named parameters for every non-raw element
    pub fn bind(&self) -> BindMap {
        self.operands()
            .into_iter()
            .enumerate()
            .filter_map(|(index, op)| match op {
                Operand::Bound(value) => Some((self.bind_name(index), value.clone())),
                Operand::Raw(_) => None,
            })
            .collect()
    }

    /// `<lhs> = :p:` for one element, `<lhs> IN (...)` for several
    pub fn eq_expr_prepared(&self, lhs: Option<&str>) -> String {
        self.comparison(lhs, "=", "IN")
    }

    /// `<lhs> <> :p:` for one element, `<lhs> NOT IN (...)` for several
    pub fn neq_expr_prepared(&self, lhs: Option<&str>) -> String {
        self.comparison(lhs, "<>", "NOT IN")
    }

    fn comparison(&self, lhs: Option<&str>, single_op: &str, list_op: &str) -> String {
        let rendered = self.rendered();
        let rhs = match rendered.as_slice() {
            [single] => format!("{} {}", single_op, single),
            [] => format!("{} (NULL)", list_op),
            many => format!("{} ({})", list_op, many.join(", ")),
        };

        match lhs {
            Some(lhs) => format!("{} {}", lhs, rhs),
            None => rhs,
        }
    }
}

impl fmt::Display for DbValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_prepared(","))
    }
}

// Fixed width, so appending the decimal index can never make two names equal
const ID_BYTES: usize = 6;

fn generate_id() -> String {
    let mut bytes = [0u8; ID_BYTES];
    if let Err(e) = OsRng.try_fill_bytes(&mut bytes) {
        tracing::warn!(error = %e, "os random source unavailable, using thread rng for value id");
        rand::rng().fill(&mut bytes);
    }
    format_id(&bytes)
}

fn format_id(bytes: &[u8; ID_BYTES]) -> String {
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("val{}", hex)
}
