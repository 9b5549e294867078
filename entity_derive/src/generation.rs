//! Code generation for the `TableSchema` derive

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

use crate::parsing::{FieldInfo, TableInfo};

/// Sanitizer attribute name to `entity_query::Sanitizer` variant
fn sanitizer_variant(name: &str) -> Ident {
    let variant = match name {
        "strip_tags" => "StripTags",
        "absint" => "AbsInt",
        "alphanum" => "AlphaNum",
        "string" => "Text",
        "trim" => "Trim",
        "lower" => "Lower",
        "upper" => "Upper",
        "int" => "Int",
        "float" => "Float",
        "email" => "Email",
        other => panic!("unknown sanitizer `{}`", other),
    };
    format_ident!("{}", variant)
}

pub fn generate_table_schema_impl(
    name: &Ident,
    table_info: &TableInfo,
    field_info: &FieldInfo,
) -> TokenStream {
    let table_name = &table_info.name;

    let primary_key = match &field_info.primary_key {
        Some(pk) => quote! { ::core::option::Option::Some(#pk) },
        None => quote! { ::core::option::Option::None },
    };

    let column_names: Vec<&str> = field_info
        .columns
        .iter()
        .map(|column| column.name.as_str())
        .collect();

    let sanitizer_entries: Vec<TokenStream> = field_info
        .columns
        .iter()
        .filter_map(|column| {
            let chain = column.sanitizers.as_ref()?;
            let field = &column.name;
            let variants = chain.iter().map(|s| sanitizer_variant(s));
            Some(quote! {
                (#field, vec![#(::entity_query::Sanitizer::#variants),*])
            })
        })
        .collect();

    let skip_fields: Vec<&str> = field_info
        .columns
        .iter()
        .filter(|column| column.skip_sanitize)
        .map(|column| column.name.as_str())
        .collect();

    quote! {
        impl ::entity_query::TableSchema for #name {
            fn table_name() -> &'static str {
                #table_name
            }

            fn describe() -> ::entity_query::Schema {
                ::entity_query::Schema::new(#table_name, #primary_key, &[#(#column_names),*])
            }

            fn input_sanitizers() -> ::std::vec::Vec<(&'static str, ::std::vec::Vec<::entity_query::Sanitizer>)> {
                vec![#(#sanitizer_entries),*]
            }

            fn skip_sanitize_fields() -> &'static [&'static str] {
                &[#(#skip_fields),*]
            }
        }
    }
}
