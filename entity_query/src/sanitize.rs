//! Input sanitizers
//!
//! Sanitizers clean user input before it is stored. They apply to strings
//! and, element-wise, to arrays and object values; other JSON types pass
//! through unless the sanitizer converts them (`int`, `float`, `string`).

use serde_json::{Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sanitizer {
    Trim,
    StripTags,
    Lower,
    Upper,
    Int,
    AbsInt,
    Float,
    AlphaNum,
    Email,
    Text,
}

/// Chain applied to fields without their own sanitizers
pub const DEFAULT_SANITIZERS: [Sanitizer; 2] = [Sanitizer::StripTags, Sanitizer::Trim];

impl Sanitizer {
    pub fn from_name(name: &str) -> Option<Self> {
        let sanitizer = match name {
            "trim" => Sanitizer::Trim,
            "strip_tags" => Sanitizer::StripTags,
            "lower" => Sanitizer::Lower,
            "upper" => Sanitizer::Upper,
            "int" => Sanitizer::Int,
            "absint" => Sanitizer::AbsInt,
            "float" => Sanitizer::Float,
            "alphanum" => Sanitizer::AlphaNum,
            "email" => Sanitizer::Email,
            "string" => Sanitizer::Text,
            _ => return None,
        };
        Some(sanitizer)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Sanitizer::Trim => "trim",
            Sanitizer::StripTags => "strip_tags",
            Sanitizer::Lower => "lower",
            Sanitizer::Upper => "upper",
            Sanitizer::Int => "int",
            Sanitizer::AbsInt => "absint",
            Sanitizer::Float => "float",
            Sanitizer::AlphaNum => "alphanum",
            Sanitizer::Email => "email",
            Sanitizer::Text => "string",
        }
    }

    pub fn apply(&self, value: Value) -> Value {
        match value {
            Value::Array(items) => Value::Array(items.into_iter().map(|v| self.apply(v)).collect()),
            Value::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, self.apply(v)))
                    .collect(),
            ),
            scalar => self.apply_scalar(scalar),
        }
    }

    fn apply_scalar(&self, value: Value) -> Value {
        match self {
            Sanitizer::Int => Value::from(to_int(&value)),
            Sanitizer::AbsInt => Value::from(to_int(&value).unsigned_abs()),
            Sanitizer::Float => Number::from_f64(to_float(&value))
                .map(Value::Number)
                .unwrap_or_else(|| Value::from(0)),
            Sanitizer::Text => match value {
                Value::Null => Value::Null,
                Value::String(s) => Value::String(encode_quotes(&strip_tags(&s))),
                other => Value::String(other.to_string()),
            },
            _ => match value {
                Value::String(s) => Value::String(self.apply_text(&s)),
                other => other,
            },
        }
    }

    fn apply_text(&self, text: &str) -> String {
        match self {
            Sanitizer::Trim => text.trim().to_string(),
            Sanitizer::StripTags => strip_tags(text),
            Sanitizer::Lower => text.to_lowercase(),
            Sanitizer::Upper => text.to_uppercase(),
            Sanitizer::AlphaNum => text.chars().filter(|c| c.is_ascii_alphanumeric()).collect(),
            Sanitizer::Email => text.chars().filter(|c| is_email_char(*c)).collect(),
            Sanitizer::Int | Sanitizer::AbsInt | Sanitizer::Float | Sanitizer::Text => {
                text.to_string()
            }
        }
    }
}

/// Run `value` through every sanitizer of `chain` in order
pub fn sanitize(value: Value, chain: &[Sanitizer]) -> Value {
    chain.iter().fold(value, |value, sanitizer| sanitizer.apply(value))
}

/// Remove `<...>` markup; an unclosed tag swallows the rest of the text
fn strip_tags(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;

    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

fn encode_quotes(text: &str) -> String {
    text.replace('"', "&#34;").replace('\'', "&#39;")
}

fn is_email_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-=?^_`{|}~@.[]".contains(c)
}

/// Leading integer of the text form, 0 when there is none
fn to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => leading_number(s, false)
            .parse::<i64>()
            .unwrap_or(0),
        _ => 0,
    }
}

fn to_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => leading_number(s, true).parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Longest numeric prefix after leading whitespace
fn leading_number(text: &str, allow_fraction: bool) -> &str {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if allow_fraction && end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_chain() {
        let cleaned = sanitize(json!("  <b>Hello</b> world "), &DEFAULT_SANITIZERS);
        assert_eq!(cleaned, json!("Hello world"));
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("a<br/>b"), "ab");
        assert_eq!(strip_tags("x > y"), "x > y");
        assert_eq!(strip_tags("safe <script"), "safe ");
    }

    #[test]
    fn test_numeric_sanitizers() {
        assert_eq!(Sanitizer::Int.apply(json!(" 42abc")), json!(42));
        assert_eq!(Sanitizer::Int.apply(json!("abc")), json!(0));
        assert_eq!(Sanitizer::Int.apply(json!(7.9)), json!(7));
        assert_eq!(Sanitizer::AbsInt.apply(json!("-15")), json!(15));
        assert_eq!(Sanitizer::Float.apply(json!("3.25kg")), json!(3.25));
        assert_eq!(Sanitizer::Float.apply(json!(null)), json!(0.0));
    }

    #[test]
    fn test_text_sanitizers() {
        assert_eq!(Sanitizer::Lower.apply(json!("MiXeD")), json!("mixed"));
        assert_eq!(Sanitizer::Upper.apply(json!("abc")), json!("ABC"));
        assert_eq!(Sanitizer::AlphaNum.apply(json!("a-b_c 1!")), json!("abc1"));
        assert_eq!(
            Sanitizer::Email.apply(json!("jo hn@exa(mple).com")),
            json!("john@example.com")
        );
        assert_eq!(
            Sanitizer::Text.apply(json!("<i>it's</i> \"ok\"")),
            json!("it&#39;s &#34;ok&#34;")
        );
        assert_eq!(Sanitizer::Text.apply(json!(5)), json!("5"));
    }

    #[test]
    fn test_arrays_are_sanitized_elementwise() {
        assert_eq!(
            sanitize(json!([" a ", 1, {"k": " v "}]), &[Sanitizer::Trim]),
            json!(["a", 1, {"k": "v"}])
        );
    }

    #[test]
    fn test_names_roundtrip() {
        for name in [
            "trim", "strip_tags", "lower", "upper", "int", "absint", "float", "alphanum",
            "email", "string",
        ] {
            assert_eq!(Sanitizer::from_name(name).map(|s| s.name()), Some(name));
        }
        assert_eq!(Sanitizer::from_name("rot13"), None);
    }
}
