//! MySQL introspection using `SHOW` and `DESCRIBE`.

use super::Dialect;
use crate::executor::QueryExecutor;
use crate::models::{ColumnDescriptor, DatabaseType};
use crate::sql::quote_mysql_identifier;
use crate::{InspectError, Result};
use async_trait::async_trait;
use sqlx::mysql::{MySql, MySqlPool, MySqlRow};
use sqlx::Row;

/// Lists all databases visible to the user
pub const LIST_DATABASES: &str = "SHOW DATABASES";
/// Lists tables of the current database
pub const LIST_TABLES: &str = "SHOW TABLES";

/// `USE <db>` statement for the given database
pub fn use_database_statement(name: &str) -> String {
    format!("USE {}", quote_mysql_identifier(name))
}

/// `DESCRIBE <table>` query for the given table
pub fn describe_query(table: &str) -> String {
    format!("DESCRIBE {}", quote_mysql_identifier(table))
}

/// MySQL dialect bound to one session.
#[derive(Debug)]
pub struct MySqlDialect {
    executor: QueryExecutor<MySql>,
}

impl MySqlDialect {
    /// Checks a session out of the pool.
    ///
    /// # Errors
    /// Returns a connection error if no session can be acquired
    pub async fn acquire(pool: &MySqlPool) -> Result<Self> {
        Ok(Self {
            executor: QueryExecutor::acquire(pool).await?,
        })
    }

    async fn first_column(&mut self, sql: &str) -> Result<Vec<String>> {
        let rows = self.executor.run_query(sql).await?;
        rows.iter()
            .map(|row| {
                text_cell(row, 0)
                    .map(Option::unwrap_or_default)
                    .map_err(|e| scan_failed(sql, e))
            })
            .collect()
    }
}

#[async_trait]
impl Dialect for MySqlDialect {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::MySQL
    }

    async fn list_databases(&mut self) -> Result<Vec<String>> {
        self.first_column(LIST_DATABASES).await
    }

    async fn select_database(&mut self, name: &str) -> Result<()> {
        self.executor
            .run_statement(&use_database_statement(name))
            .await
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        self.first_column(LIST_TABLES).await
    }

    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let sql = describe_query(table);
        let rows = self.executor.run_query(&sql).await?;
        rows.iter()
            .map(|row| describe_row(row).map_err(|e| scan_failed(&sql, e)))
            .collect()
    }
}

/// Maps a `DESCRIBE` row (`Field, Type, Null, Key, Default, Extra`).
fn describe_row(row: &MySqlRow) -> std::result::Result<ColumnDescriptor, sqlx::Error> {
    Ok(ColumnDescriptor::from_cells([
        text_cell(row, 0)?,
        text_cell(row, 1)?,
        text_cell(row, 2)?,
        text_cell(row, 3)?,
        text_cell(row, 4)?,
        text_cell(row, 5)?,
    ]))
}

/// Reads a nullable text cell.
///
/// MySQL 8 reports some metadata columns (`DESCRIBE`'s `Type`, binary
/// collations) as blobs, which do not decode as `String`; those are read as
/// bytes and converted lossily.
fn text_cell(row: &MySqlRow, index: usize) -> std::result::Result<Option<String>, sqlx::Error> {
    match row.try_get::<Option<String>, _>(index) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnDecode { .. }) => {
            let bytes: Option<Vec<u8>> = row.try_get(index)?;
            Ok(lossy_text(bytes))
        }
        Err(e) => Err(e),
    }
}

/// Converts a binary cell to text, keeping NULL distinct from empty.
fn lossy_text(bytes: Option<Vec<u8>>) -> Option<String> {
    bytes.map(|b| String::from_utf8_lossy(&b).into_owned())
}

fn scan_failed(sql: &str, error: sqlx::Error) -> InspectError {
    tracing::error!("error to scan rows of {}: {}", sql, error);
    InspectError::query_failed(sql, error)
}
