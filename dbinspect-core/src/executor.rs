//! Query executor over one dedicated pooled connection.
//!
//! A single session is held for the whole walk because the context switch
//! (`USE` / `SET search_path`) is per-session state. Statements are passed
//! as plain `&str` without arguments, which both drivers send over the text
//! protocol; MySQL refuses `USE` as a prepared statement.
//!
//! Failures are logged with the offending SQL and returned as
//! [`InspectError::QueryFailed`], so an empty row set always means the query
//! succeeded.

use crate::{InspectError, Result};
use sqlx::pool::PoolConnection;
use sqlx::{Database, Executor, Pool};

/// Runs SQL against one pooled session.
pub struct QueryExecutor<DB: Database> {
    conn: PoolConnection<DB>,
}

impl<DB: Database> std::fmt::Debug for QueryExecutor<DB> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("database", &DB::NAME)
            .finish_non_exhaustive()
    }
}

impl<DB> QueryExecutor<DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: Executor<'c, Database = DB>,
{
    /// Checks a session out of the pool for the executor's lifetime.
    ///
    /// # Errors
    /// Returns a connection error if no session can be acquired
    pub async fn acquire(pool: &Pool<DB>) -> Result<Self> {
        let conn = pool.acquire().await.map_err(|e| {
            InspectError::connection_failed(format!("Failed to acquire {} session", DB::NAME), e)
        })?;
        Ok(Self { conn })
    }

    /// Executes a read statement and returns all of its rows.
    ///
    /// # Errors
    /// Returns [`InspectError::QueryFailed`] after logging the SQL and the
    /// driver error
    pub async fn run_query(&mut self, sql: &str) -> Result<Vec<DB::Row>> {
        tracing::debug!("Running query: {}", sql);
        match self.conn.fetch_all(sql).await {
            Ok(rows) => {
                tracing::trace!("Query returned {} rows", rows.len());
                Ok(rows)
            }
            Err(e) => {
                tracing::error!("error to run query {}: {}", sql, e);
                Err(InspectError::query_failed(sql, e))
            }
        }
    }

    /// Executes a statement that produces no row set.
    ///
    /// # Errors
    /// Returns [`InspectError::QueryFailed`] after logging the SQL and the
    /// driver error
    pub async fn run_statement(&mut self, sql: &str) -> Result<()> {
        tracing::debug!("Executing statement: {}", sql);
        match self.conn.execute(sql).await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!("error to execute query {}: {}", sql, e);
                Err(InspectError::query_failed(sql, e))
            }
        }
    }
}
