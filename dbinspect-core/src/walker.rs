//! Schema walker: list databases, select one, list its tables, describe each.
//!
//! The walk is strictly sequential and runs once; there is no resumption.
//!
//! # Failure policy
//! - Listing databases or tables fails the walk.
//! - A failed context switch is logged and the walk continues.
//! - A failed describe yields an empty report carrying the failure and the
//!   walk moves on to the next table.

use crate::dialect::Dialect;
use crate::models::{SchemaWalk, TableReport};
use crate::{InspectError, Result};

/// Receives walk progress as it happens.
///
/// Lets output stream table by table instead of after the whole walk.
pub trait WalkObserver {
    /// Called once the target database has been selected.
    fn database_selected(&mut self, name: &str) -> Result<()>;

    /// Called after each table has been described (or failed to).
    fn table_described(&mut self, report: &TableReport) -> Result<()>;
}

/// Observer that ignores all progress.
impl WalkObserver for () {
    fn database_selected(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn table_described(&mut self, _report: &TableReport) -> Result<()> {
        Ok(())
    }
}

/// Picks the target database from the listed names by exact name.
///
/// # Errors
/// Returns [`InspectError::DatabaseNotFound`] if the name is not listed,
/// including when the listing is empty
pub fn select_target<'a>(databases: &'a [String], target: &str) -> Result<&'a str> {
    databases
        .iter()
        .find(|name| name.as_str() == target)
        .map(String::as_str)
        .ok_or_else(|| InspectError::DatabaseNotFound {
            name: target.to_string(),
            available: databases.to_vec(),
        })
}

/// Drives one walk over a dialect.
pub struct SchemaWalker<'d> {
    dialect: &'d mut dyn Dialect,
}

impl std::fmt::Debug for SchemaWalker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaWalker")
            .field("dialect", &self.dialect.database_type())
            .finish()
    }
}

impl<'d> SchemaWalker<'d> {
    /// Creates a walker over the given dialect.
    pub fn new(dialect: &'d mut dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Walks the `target` database and reports progress to `observer`.
    ///
    /// # Returns
    /// The selected database and one report per listed table, in listing order
    ///
    /// # Errors
    /// Returns error if the database or table listing fails, the target is not
    /// listed, or the observer fails
    pub async fn walk(
        &mut self,
        target: &str,
        observer: &mut dyn WalkObserver,
    ) -> Result<SchemaWalk> {
        let kind = self.dialect.database_type();
        let start_time = std::time::Instant::now();

        tracing::debug!("Listing {} databases", kind);
        let databases = self.dialect.list_databases().await?;
        tracing::info!("Databases: [{}]", databases.join(", "));

        let database = select_target(&databases, target)?.to_string();

        if let Err(e) = self.dialect.select_database(&database).await {
            tracing::warn!("Continuing without switching context to {}: {}", database, e);
        }
        observer.database_selected(&database)?;

        let table_names = self.dialect.list_tables().await?;
        tracing::info!("Found {} tables in {}", table_names.len(), database);

        let mut tables = Vec::with_capacity(table_names.len());
        for table_name in table_names {
            let report = match self.dialect.describe_table(&table_name).await {
                Ok(columns) => {
                    tracing::debug!("Described {} ({} columns)", table_name, columns.len());
                    TableReport::described(table_name, columns)
                }
                Err(e) => {
                    tracing::warn!("Failed to describe table {}: {}", table_name, e);
                    TableReport::failed(table_name, e.to_string())
                }
            };
            observer.table_described(&report)?;
            tables.push(report);
        }

        let walk = SchemaWalk { database, tables };
        tracing::info!(
            "{} walk of {} completed in {:.2}s - {} tables, {} failed",
            kind,
            walk.database,
            start_time.elapsed().as_secs_f64(),
            walk.tables.len(),
            walk.failed_tables()
        );

        Ok(walk)
    }
}
