//! Connection factory: descriptor strings and pooled connections.
//!
//! # Security Features
//! - Descriptor strings are only logged in redacted form
//! - Every pooled session is switched to read-only transactions
//! - Pool size and connection lifetime are bounded

use crate::config::ConnectionParameters;
use crate::models::DatabaseType;
use crate::{InspectError, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::time::Duration;

/// Static pool limits applied after the pool is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    /// Maximum number of open connections
    pub max_open: u32,
    /// Maximum number of idle connections
    pub max_idle: u32,
    /// Maximum lifetime of a single connection
    pub max_lifetime: Duration,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            max_open: 20,
            max_idle: 20,
            max_lifetime: Duration::from_secs(5 * 60),
        }
    }
}

impl PoolLimits {
    /// Validates the limits.
    ///
    /// # Errors
    /// Returns error if `max_open` is zero, `max_idle` exceeds `max_open`, or
    /// the lifetime is zero
    pub fn validate(&self) -> Result<()> {
        if self.max_open == 0 {
            return Err(InspectError::configuration(
                "max_open must be greater than 0",
            ));
        }
        if self.max_idle > self.max_open {
            return Err(InspectError::configuration(
                "max_idle must not exceed max_open",
            ));
        }
        if self.max_lifetime.is_zero() {
            return Err(InspectError::configuration(
                "max_lifetime must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Builds the driver descriptor string for the given dialect.
///
/// Pure function of its inputs:
/// - PostgreSQL: `host=<h> port=<p> user=<u> password=<pw> dbname=<d> sslmode=disable`
/// - MySQL: `<u>:<pw>@tcp(<h>)/<d>`
pub fn descriptor(params: &ConnectionParameters, kind: DatabaseType) -> String {
    render_descriptor(params, kind, params.password())
}

/// Same as [`descriptor`] with the password replaced by `****`.
pub fn redacted_descriptor(params: &ConnectionParameters, kind: DatabaseType) -> String {
    let mask = if params.has_password() { "****" } else { "" };
    render_descriptor(params, kind, mask)
}

fn render_descriptor(params: &ConnectionParameters, kind: DatabaseType, password: &str) -> String {
    match kind {
        DatabaseType::PostgreSQL => format!(
            "host={} port={} user={} password={} dbname={} sslmode=disable",
            params.host, params.port, params.user, password, params.database
        ),
        DatabaseType::MySQL => format!(
            "{}:{}@tcp({})/{}",
            params.user, password, params.host, params.database
        ),
    }
}

/// Driver options for MySQL built from the same parameters as the descriptor.
pub fn mysql_options(params: &ConnectionParameters) -> Result<MySqlConnectOptions> {
    let mut options = MySqlConnectOptions::new()
        .port(params.port_number()?.unwrap_or(DatabaseType::MySQL.default_port()));
    if !params.host.is_empty() {
        options = options.host(&params.host);
    }
    if !params.user.is_empty() {
        options = options.username(&params.user);
    }
    if params.has_password() {
        options = options.password(params.password());
    }
    if !params.database.is_empty() {
        options = options.database(&params.database);
    }
    Ok(options)
}

/// Driver options for PostgreSQL built from the same parameters as the descriptor.
pub fn postgres_options(params: &ConnectionParameters) -> Result<PgConnectOptions> {
    let mut options = PgConnectOptions::new()
        .port(params.port_number()?.unwrap_or(DatabaseType::PostgreSQL.default_port()))
        .ssl_mode(PgSslMode::Disable);
    if !params.host.is_empty() {
        options = options.host(&params.host);
    }
    if !params.user.is_empty() {
        options = options.username(&params.user);
    }
    if params.has_password() {
        options = options.password(params.password());
    }
    if !params.database.is_empty() {
        options = options.database(&params.database);
    }
    Ok(options)
}

/// An open, pooled database connection.
///
/// Owned by the process for its lifetime and released once with [`close`].
///
/// [`close`]: Connection::close
#[derive(Debug, Clone)]
pub enum Connection {
    /// MySQL pool
    MySql(MySqlPool),
    /// PostgreSQL pool
    Postgres(PgPool),
}

impl Connection {
    /// Opens a pooled connection for the given dialect.
    ///
    /// The pool connects eagerly so an unreachable server or bad credentials
    /// fail here rather than at the first query.
    ///
    /// # Errors
    /// Returns error if the port is invalid, the limits are invalid, or the
    /// server cannot be reached
    pub async fn open(
        params: &ConnectionParameters,
        kind: DatabaseType,
        limits: PoolLimits,
    ) -> Result<Self> {
        limits.validate()?;
        let target = redacted_descriptor(params, kind);
        tracing::info!("Connecting to {} using {}", kind, target);

        let connection = match kind {
            DatabaseType::MySQL => {
                let pool = MySqlPoolOptions::new()
                    .max_connections(limits.max_open)
                    .max_lifetime(limits.max_lifetime)
                    .after_connect(|conn, _meta| {
                        Box::pin(async move {
                            use sqlx::Executor;
                            conn.execute("SET SESSION TRANSACTION READ ONLY").await?;
                            Ok(())
                        })
                    })
                    .connect_with(mysql_options(params)?)
                    .await
                    .map_err(|e| {
                        InspectError::connection_failed(
                            format!("Error when opening MySQL database {}", target),
                            e,
                        )
                    })?;
                Self::MySql(pool)
            }
            DatabaseType::PostgreSQL => {
                let pool = PgPoolOptions::new()
                    .max_connections(limits.max_open)
                    .max_lifetime(limits.max_lifetime)
                    .after_connect(|conn, _meta| {
                        Box::pin(async move {
                            use sqlx::Executor;
                            conn.execute("SET SESSION CHARACTERISTICS AS TRANSACTION READ ONLY")
                                .await?;
                            Ok(())
                        })
                    })
                    .connect_with(postgres_options(params)?)
                    .await
                    .map_err(|e| {
                        InspectError::connection_failed(
                            format!("Error when opening PostgreSQL database {}", target),
                            e,
                        )
                    })?;
                Self::Postgres(pool)
            }
        };

        // sqlx keeps at most max_connections idle, which equals max_idle here
        tracing::debug!(
            "Pool limits: max_open={}, max_idle={}, max_lifetime={}s",
            limits.max_open,
            limits.max_idle,
            limits.max_lifetime.as_secs()
        );

        Ok(connection)
    }

    /// Returns the dialect this connection speaks.
    pub const fn database_type(&self) -> DatabaseType {
        match self {
            Self::MySql(_) => DatabaseType::MySQL,
            Self::Postgres(_) => DatabaseType::PostgreSQL,
        }
    }

    /// Closes the pool gracefully.
    ///
    /// Waits for checked-out connections to be returned, so any dialect
    /// built from this connection must be dropped first.
    pub async fn close(self) {
        match self {
            Self::MySql(pool) => pool.close().await,
            Self::Postgres(pool) => pool.close().await,
        }
        tracing::debug!("Connection closed");
    }
}
