//! SQL text construction.
//!
//! This is the only place where names are interpolated into SQL. Database,
//! schema and table names reach it from the server's own catalog listings or
//! from the operator's configuration, never from remote input. Every name is
//! still quoted so a hostile catalog entry cannot break out of its slot.

/// Quotes a MySQL identifier with backticks, doubling embedded backticks.
pub fn quote_mysql_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quotes a PostgreSQL identifier with double quotes, doubling embedded quotes.
pub fn quote_pg_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quotes a PostgreSQL string literal, doubling embedded single quotes.
///
/// Backslashes are literal under `standard_conforming_strings`, the server
/// default since 9.1.
pub fn quote_pg_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
