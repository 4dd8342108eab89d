//! SQL quoting utilities
//!
//! The ledger is driven through plain SQL text, so table names and migration
//! names are quoted here before being spliced into statements.

/// Quote a SQL identifier to prevent injection.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use trso_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("migrations"), r#""migrations""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render a value as a complete single-quoted SQL string literal.
///
/// # Examples
/// ```
/// use trso_core::sql_utils::quote_literal;
/// assert_eq!(quote_literal("001_init.sql"), "'001_init.sql'");
/// assert_eq!(quote_literal("it's.sql"), "'it''s.sql'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}
