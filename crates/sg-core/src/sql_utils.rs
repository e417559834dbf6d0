//! SQL identifier quoting utilities
//!
//! Table and schema names come from configuration, so they are quoted before
//! being interpolated into DDL and DML.

/// Quote a SQL identifier, doubling any embedded double quotes.
///
/// # Examples
/// ```
/// use sg_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("versions"), r#""versions""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a table name, optionally qualified by a schema.
///
/// # Examples
/// ```
/// use sg_core::sql_utils::qualified_table;
/// assert_eq!(qualified_table(None, "versions"), r#""versions""#);
/// assert_eq!(qualified_table(Some("meta"), "versions"), r#""meta"."versions""#);
/// ```
pub fn qualified_table(schema: Option<&str>, table: &str) -> String {
    match schema {
        Some(schema) => format!("{}.{}", quote_ident(schema), quote_ident(table)),
        None => quote_ident(table),
    }
}
