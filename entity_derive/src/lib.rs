//! Procedural macros for entity schemas
//!
//! This crate provides the `TableSchema` derive, which describes a struct's
//! table, primary key, columns and input sanitizers to the entity query
//! pipeline.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod generation;
mod parsing;

use generation::generate_table_schema_impl;
use parsing::{parse_field_attributes, parse_table_attributes};

/// Derive macro for the `TableSchema` trait
///
/// ```rust,ignore
/// use entity_query::TableSchema;
///
/// #[derive(TableSchema)]
/// #[table(name = "articles")]
/// pub struct Article {
///     #[primary_key]
///     pub id: i64,
///
///     #[input(trim)]
///     pub title: String,
///
///     #[input(skip)]
///     pub body_html: String,
///
///     #[column(skip)]
///     pub comment_count: i64,
/// }
/// ```
#[proc_macro_derive(TableSchema, attributes(table, primary_key, column, input))]
pub fn derive_table_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let table_info = match parse_table_attributes(&input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let field_info = match parse_field_attributes(&input.data) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    generate_table_schema_impl(&input.ident, &table_info, &field_info).into()
}
