//! Parsing utilities for table, column and input attributes
//!
//! This module handles the parsing of `#[table]`, `#[primary_key]`,
//! `#[column]` and `#[input]` attributes and validation of table and
//! column names.

use syn::ext::IdentExt;
use syn::{Attribute, Data, Error, Fields, LitStr, Result};

/// Sanitizer names accepted by `#[input(...)]`
pub const SANITIZER_NAMES: &[&str] = &[
    "trim",
    "strip_tags",
    "lower",
    "upper",
    "int",
    "absint",
    "float",
    "alphanum",
    "email",
    "string",
];

/// PostgreSQL identifier length limit
const MAX_IDENTIFIER_LENGTH: usize = 63;

#[derive(Debug)]
pub struct TableInfo {
    pub name: String,
}

#[derive(Debug)]
pub struct ColumnInfo {
    pub name: String,
    /// Per-field sanitizer chain, the default chain applies when `None`
    pub sanitizers: Option<Vec<String>>,
    pub skip_sanitize: bool,
}

#[derive(Debug)]
pub struct FieldInfo {
    pub primary_key: Option<String>,
    pub columns: Vec<ColumnInfo>,
}

fn validate_identifier_syn(kind: &str, name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid {} name '{}': {}", kind, name, e)))
}

fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "name cannot be empty".to_string())?;

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(format!(
            "too long: {} characters (max {})",
            name.len(),
            MAX_IDENTIFIER_LENGTH
        ));
    }

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err("must start with a letter or underscore".to_string());
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(
            "only alphanumeric characters and underscores are allowed".to_string(),
        );
    }

    if is_reserved_keyword(name) {
        return Err("reserved SQL keyword".to_string());
    }

    Ok(())
}

fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "JOIN", "ON", "AS", "AND",
        "OR", "NOT", "NULL", "TRUE", "FALSE", "IN", "LIKE", "BETWEEN", "ORDER", "BY", "GROUP",
        "HAVING", "LIMIT", "OFFSET", "UNION", "ALL", "DISTINCT", "CREATE", "DROP", "ALTER",
        "TABLE", "PRIMARY", "FOREIGN", "REFERENCES", "UNIQUE", "CHECK", "DEFAULT",
        "CONSTRAINT", "CASE", "WHEN", "THEN", "ELSE", "END", "RETURNING",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

pub fn parse_table_attributes(attrs: &[Attribute]) -> Result<TableInfo> {
    let mut table_name: Option<LitStr> = None;

    for attr in attrs {
        if attr.path().is_ident("table") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    table_name = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported table attribute, expected `name`"))
                }
            })?;
        }
    }

    let table_name = table_name.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "table attribute is required: add #[table(name = \"table_name\")] to your struct",
        )
    })?;

    validate_identifier_syn("table", &table_name.value(), table_name.span())?;

    Ok(TableInfo {
        name: table_name.value(),
    })
}

pub fn parse_field_attributes(data: &Data) -> Result<FieldInfo> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "TableSchema can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "TableSchema can only be derived for structs with named fields",
        ));
    };

    let mut primary_key = None;
    let mut columns = Vec::new();

    for field in &fields_named.named {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;

        let mut column_name = field_name.unraw().to_string();
        let mut skip = false;

        for attr in &field.attrs {
            if attr.path().is_ident("column") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("skip") {
                        skip = true;
                        Ok(())
                    } else if meta.path.is_ident("name") {
                        let lit: LitStr = meta.value()?.parse()?;
                        column_name = lit.value();
                        Ok(())
                    } else {
                        Err(meta.error("unsupported column attribute, expected `skip` or `name`"))
                    }
                })?;
            }
        }

        if skip {
            continue;
        }

        validate_identifier_syn("column", &column_name, field_name.span())?;

        if has_attribute(&field.attrs, "primary_key") {
            if primary_key.is_some() {
                return Err(Error::new(
                    field_name.span(),
                    "only one field can be marked #[primary_key]",
                ));
            }
            primary_key = Some(column_name.clone());
        }

        let (sanitizers, skip_sanitize) = parse_input_attribute(&field.attrs)?;

        columns.push(ColumnInfo {
            name: column_name,
            sanitizers,
            skip_sanitize,
        });
    }

    Ok(FieldInfo {
        primary_key,
        columns,
    })
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// Parse `#[input(trim, lower)]` or `#[input(skip)]`
fn parse_input_attribute(attrs: &[Attribute]) -> Result<(Option<Vec<String>>, bool)> {
    let mut sanitizers: Option<Vec<String>> = None;
    let mut skip = false;

    for attr in attrs {
        if !attr.path().is_ident("input") {
            continue;
        }

        let chain = sanitizers.get_or_insert_with(Vec::new);
        attr.parse_nested_meta(|meta| {
            let name = meta
                .path
                .get_ident()
                .map(|ident| ident.to_string())
                .ok_or_else(|| meta.error("expected a sanitizer name"))?;

            if name == "skip" {
                skip = true;
                return Ok(());
            }

            if !SANITIZER_NAMES.contains(&name.as_str()) {
                return Err(meta.error(format!(
                    "unknown sanitizer `{}`, expected one of: {}",
                    name,
                    SANITIZER_NAMES.join(", ")
                )));
            }

            chain.push(name);
            Ok(())
        })?;
    }

    if skip {
        sanitizers = None;
    }

    Ok((sanitizers, skip))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{parse_quote, DeriveInput};

    fn parse(input: DeriveInput) -> Result<(TableInfo, FieldInfo)> {
        let table = parse_table_attributes(&input.attrs)?;
        let fields = parse_field_attributes(&input.data)?;
        Ok((table, fields))
    }

    #[test]
    fn test_parse_full_struct() {
        let input: DeriveInput = parse_quote! {
            #[table(name = "articles")]
            struct Article {
                #[primary_key]
                id: i64,
                #[input(trim, lower)]
                slug: String,
                #[input(skip)]
                body_html: String,
                #[column(name = "title_text")]
                title: String,
                #[column(skip)]
                comment_count: i64,
                r#type: String,
            }
        };

        let (table, fields) = parse(input).unwrap();
        assert_eq!(table.name, "articles");
        assert_eq!(fields.primary_key.as_deref(), Some("id"));

        let names: Vec<&str> = fields.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "slug", "body_html", "title_text", "type"]);

        assert_eq!(
            fields.columns[1].sanitizers,
            Some(vec!["trim".to_string(), "lower".to_string()])
        );
        assert!(fields.columns[2].skip_sanitize);
        assert!(fields.columns[3].sanitizers.is_none());
    }

    #[test]
    fn test_table_attribute_required() {
        let input: DeriveInput = parse_quote! {
            struct Nameless { id: i64 }
        };
        assert!(parse_table_attributes(&input.attrs).is_err());
    }

    #[test]
    fn test_invalid_names_rejected() {
        let input: DeriveInput = parse_quote! {
            #[table(name = "user-table")]
            struct Bad { id: i64 }
        };
        assert!(parse_table_attributes(&input.attrs).is_err());

        let input: DeriveInput = parse_quote! {
            #[table(name = "orders")]
            struct Bad {
                #[column(name = "select")]
                id: i64,
            }
        };
        assert!(parse_field_attributes(&input.data).is_err());
    }

    #[test]
    fn test_unknown_sanitizer_rejected() {
        let input: DeriveInput = parse_quote! {
            #[table(name = "users")]
            struct User {
                #[input(rot13)]
                name: String,
            }
        };
        assert!(parse_field_attributes(&input.data).is_err());
    }

    #[test]
    fn test_single_primary_key() {
        let input: DeriveInput = parse_quote! {
            #[table(name = "users")]
            struct User {
                #[primary_key]
                id: i64,
                #[primary_key]
                other_id: i64,
            }
        };
        assert!(parse_field_attributes(&input.data).is_err());
    }

    #[test]
    fn test_enums_rejected() {
        let input: DeriveInput = parse_quote! {
            #[table(name = "users")]
            enum User { A, B }
        };
        assert!(parse_field_attributes(&input.data).is_err());
    }
}
