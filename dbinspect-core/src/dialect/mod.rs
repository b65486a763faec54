//! Dialect capability interface for schema introspection.
//!
//! The two supported engines differ only in query text and in how the
//! session context is switched, so the walker talks to a `Dialect` and never
//! branches on the engine itself.
//!
//! # Module Structure
//! - `mysql`: `SHOW DATABASES` / `USE` / `SHOW TABLES` / `DESCRIBE`
//! - `postgres`: `pg_database` / `search_path` / `pg_tables` / `information_schema.columns`

use crate::Result;
use crate::connection::Connection;
use crate::models::{ColumnDescriptor, DatabaseType};
use async_trait::async_trait;

pub mod mysql;
pub mod postgres;

pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;

/// Read-only introspection operations a walk needs from a database engine.
///
/// Each operation returns `Err` when its query fails, so an empty vector
/// always means the server returned no rows.
#[async_trait]
pub trait Dialect: Send {
    /// Returns the database type this dialect speaks.
    fn database_type(&self) -> DatabaseType;

    /// Lists database names in server order.
    async fn list_databases(&mut self) -> Result<Vec<String>>;

    /// Switches the session context to the selected database.
    async fn select_database(&mut self, name: &str) -> Result<()>;

    /// Lists table names of the selected database in server order.
    async fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Describes the columns of one table in server order.
    async fn describe_table(&mut self, table: &str) -> Result<Vec<ColumnDescriptor>>;
}

/// Builds the dialect for an open connection.
///
/// The dialect checks one session out of the pool and holds it until it is
/// dropped; drop it before closing the connection.
///
/// # Arguments
/// * `connection` - Open pooled connection
/// * `schema` - PostgreSQL schema for `search_path` (ignored for MySQL)
///
/// # Errors
/// Returns error if no session can be acquired from the pool
pub async fn open_dialect(connection: &Connection, schema: &str) -> Result<Box<dyn Dialect>> {
    match connection {
        Connection::MySql(pool) => Ok(Box::new(MySqlDialect::acquire(pool).await?)),
        Connection::Postgres(pool) => {
            Ok(Box::new(PostgresDialect::acquire(pool, schema).await?))
        }
    }
}
