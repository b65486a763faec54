//! Error types for schema introspection.
//!
//! Connection errors never carry the password or the raw descriptor string;
//! query errors carry the SQL text, which only ever contains server-sourced
//! names.

use thiserror::Error;

/// Main error type for dbinspect operations.
#[derive(Debug, Error)]
pub enum InspectError {
    /// Opening the database connection failed (credentials sanitized)
    #[error("Database connection failed: {context}")]
    Connection {
        /// Redacted description of the connection attempt
        context: String,
        /// Underlying driver error
        #[source]
        source: sqlx::Error,
    },

    /// A query or statement failed to execute or its rows failed to scan
    #[error("Query failed: {sql}")]
    QueryFailed {
        /// The SQL text that was sent to the server
        sql: String,
        /// Underlying driver error
        #[source]
        source: sqlx::Error,
    },

    /// The configured target database is not among the listed databases
    #[error("Database '{name}' not found on server (available: [{}])", available.join(", "))]
    DatabaseNotFound {
        /// Configured database name
        name: String,
        /// Databases reported by the server
        available: Vec<String>,
    },

    /// Configuration or environment loading error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human readable description
        message: String,
    },

    /// Writing the report failed
    #[error("I/O operation failed: {context}")]
    Io {
        /// What was being written
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results with `InspectError`
pub type Result<T> = std::result::Result<T, InspectError>;

impl InspectError {
    /// Creates a connection error with a redacted context
    pub fn connection_failed(context: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Connection {
            context: context.into(),
            source,
        }
    }

    /// Creates a query error for the given SQL text
    pub fn query_failed(sql: impl Into<String>, source: sqlx::Error) -> Self {
        Self::QueryFailed {
            sql: sql.into(),
            source,
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns true if the error came from a failed query rather than setup
    pub const fn is_query_failure(&self) -> bool {
        matches!(self, Self::QueryFailed { .. })
    }
}
