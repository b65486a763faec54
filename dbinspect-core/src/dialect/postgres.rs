//! PostgreSQL introspection using `pg_catalog` and `information_schema`.
//!
//! All selected columns are cast to `text` so the simple query protocol can
//! decode catalog domains (`name`, `sql_identifier`, `yes_or_no`,
//! `cardinal_number`) uniformly as strings.

use super::Dialect;
use crate::executor::QueryExecutor;
use crate::models::{ColumnDescriptor, DatabaseType};
use crate::sql::{quote_pg_identifier, quote_pg_literal};
use crate::{InspectError, Result};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow, Postgres};
use std::collections::HashMap;

/// Lists all databases on the server
pub const LIST_DATABASES: &str = "SELECT datname::text FROM pg_database";

/// Lists tables outside the system schemas as `(schema, table)` pairs
pub const LIST_TABLES: &str = "SELECT schemaname::text, tablename::text FROM pg_catalog.pg_tables \
     WHERE schemaname != 'pg_catalog' AND schemaname != 'information_schema' \
     ORDER BY schemaname, tablename";

/// `SET search_path TO <schema>` statement
pub fn search_path_statement(schema: &str) -> String {
    format!("SET search_path TO {}", quote_pg_identifier(schema))
}

/// Column introspection query for one table, ordered by ordinal position.
///
/// Slot mapping: `is_identity` fills the key role and `ordinal_position` the
/// extra column. The sort key is qualified so it binds to the integer source
/// column rather than the `text` output column of the same name.
pub fn describe_query(schema: &str, table: &str) -> String {
    format!(
        "SELECT c.column_name::text, c.data_type::text, c.is_nullable::text, \
         c.is_identity::text, c.column_default::text, c.ordinal_position::text \
         FROM information_schema.columns c \
         WHERE c.table_schema = {} AND c.table_name = {} \
         ORDER BY c.ordinal_position",
        quote_pg_literal(schema),
        quote_pg_literal(table)
    )
}

/// Name a listed table is reported under.
///
/// Tables in the search-path schema keep their bare name; tables from other
/// schemas are qualified so that equal names stay distinct.
pub fn report_name(search_schema: &str, schema: &str, table: &str) -> String {
    if schema == search_schema {
        table.to_string()
    } else {
        format!("{}.{}", schema, table)
    }
}

/// PostgreSQL dialect bound to one session.
#[derive(Debug)]
pub struct PostgresDialect {
    executor: QueryExecutor<Postgres>,
    schema: String,
    listed: HashMap<String, (String, String)>,
}

impl PostgresDialect {
    /// Checks a session out of the pool.
    ///
    /// # Arguments
    /// * `pool` - PostgreSQL pool
    /// * `schema` - Schema to put on the `search_path` when a database is selected
    ///
    /// # Errors
    /// Returns a connection error if no session can be acquired
    pub async fn acquire(pool: &PgPool, schema: &str) -> Result<Self> {
        Ok(Self {
            executor: QueryExecutor::acquire(pool).await?,
            schema: schema.to_string(),
            listed: HashMap::new(),
        })
    }

    /// Schema used for the `search_path` context switch
    pub fn schema(&self) -> &str {
        &self.schema
    }

    async fn first_column(&mut self, sql: &str) -> Result<Vec<String>> {
        let rows = self.executor.run_query(sql).await?;
        rows.iter()
            .map(|row| {
                row.try_get::<Option<String>, _>(0)
                    .map(Option::unwrap_or_default)
                    .map_err(|e| scan_failed(sql, e))
            })
            .collect()
    }
}

#[async_trait]
impl Dialect for PostgresDialect {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::PostgreSQL
    }

    async fn list_databases(&mut self) -> Result<Vec<String>> {
        self.first_column(LIST_DATABASES).await
    }

    /// The session is already bound to the connected database; selecting it
    /// sets the schema search path.
    async fn select_database(&mut self, name: &str) -> Result<()> {
        tracing::debug!(
            "Selecting database {} with search_path {}",
            name,
            self.schema
        );
        let statement = search_path_statement(&self.schema);
        self.executor.run_statement(&statement).await
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        let rows = self.executor.run_query(LIST_TABLES).await?;
        let pairs = rows
            .iter()
            .map(|row| {
                let schema: Option<String> = row.try_get(0)?;
                let table: Option<String> = row.try_get(1)?;
                Ok((schema.unwrap_or_default(), table.unwrap_or_default()))
            })
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| scan_failed(LIST_TABLES, e))?;

        self.listed.clear();
        let mut names = Vec::with_capacity(pairs.len());
        for (schema, table) in pairs {
            let name = report_name(&self.schema, &schema, &table);
            self.listed.insert(name.clone(), (schema, table));
            names.push(name);
        }
        Ok(names)
    }

    /// Resolves `table` against the last listing; unlisted names are looked
    /// up in the search-path schema.
    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let sql = match self.listed.get(table) {
            Some((schema, name)) => describe_query(schema, name),
            None => describe_query(&self.schema, table),
        };
        let rows = self.executor.run_query(&sql).await?;
        rows.iter()
            .map(|row| describe_row(row).map_err(|e| scan_failed(&sql, e)))
            .collect()
    }
}

fn describe_row(row: &PgRow) -> std::result::Result<ColumnDescriptor, sqlx::Error> {
    Ok(ColumnDescriptor::from_cells([
        row.try_get(0)?,
        row.try_get(1)?,
        row.try_get(2)?,
        row.try_get(3)?,
        row.try_get(4)?,
        row.try_get(5)?,
    ]))
}

fn scan_failed(sql: &str, error: sqlx::Error) -> InspectError {
    tracing::error!("error to scan rows of {}: {}", sql, error);
    InspectError::query_failed(sql, error)
}
