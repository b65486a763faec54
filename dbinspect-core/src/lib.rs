//! Read-only schema introspection for MySQL and PostgreSQL.
//!
//! A run opens one pooled connection, lists the server's databases, selects
//! the configured one, lists its tables and describes each table's columns,
//! printing every table as soon as it has been described.
//!
//! # Security Guarantees
//! - Sessions are read-only; only `SHOW`, `DESCRIBE`, `SELECT` and session
//!   context switches are issued
//! - Passwords are zeroized on drop and never logged
//! - Names interpolated into SQL are always quoted (see [`sql`])
//!
//! # Architecture
//! - [`config`] loads connection parameters from the environment
//! - [`connection`] builds descriptors and opens the pool
//! - [`executor`] runs SQL on one dedicated session
//! - [`dialect`] is the per-engine capability interface
//! - [`walker`] drives the introspection sequence
//! - [`report`] prints the result

pub mod config;
pub mod connection;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod report;
pub mod sql;
pub mod walker;

// Re-export commonly used types
pub use config::ConnectionParameters;
pub use connection::{Connection, PoolLimits, descriptor};
pub use dialect::{Dialect, open_dialect};
pub use error::{InspectError, Result};
pub use logging::init_logging;
pub use models::{ColumnDescriptor, DatabaseType, SchemaWalk, TableReport};
pub use report::Reporter;
pub use walker::{SchemaWalker, WalkObserver};
