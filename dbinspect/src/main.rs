//! Database schema inspector.
//!
//! Connects to one MySQL or PostgreSQL server, walks the configured database
//! and prints every table's column definitions. The run is strictly
//! sequential and read-only.
//!
//! # Exit behavior
//! - Fatal (non-zero exit): env file load failure, connection failure,
//!   database or table listing failure, unknown target database
//! - Logged and skipped: context switch failure, per-table describe failure

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use dbinspect_core::{
    Connection, ConnectionParameters, PoolLimits, Reporter, SchemaWalker, config, init_logging,
    open_dialect,
};
use std::process::ExitCode;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads configuration, opens the connection and always closes it again.
async fn run(cli: &Cli) -> anyhow::Result<()> {
    let kind = cli.database_type();

    let (env_file, required) = cli.env_file();
    config::load_env_file(env_file, required)?;

    let params = ConnectionParameters::from_env();
    let schema = cli.schema.clone().unwrap_or_else(config::schema_from_env);

    let connection = Connection::open(&params, kind, PoolLimits::default())
        .await
        .with_context(|| format!("Error when opening {} database", kind))?;
    info!("Connected to {} at {}", kind, params);

    let outcome = inspect(&connection, &params.database, &schema).await;
    connection.close().await;
    outcome
}

/// Walks the target database and streams the report to stdout.
async fn inspect(connection: &Connection, target: &str, schema: &str) -> anyhow::Result<()> {
    let mut dialect = open_dialect(connection, schema).await?;
    let mut reporter = Reporter::new(std::io::stdout());

    let walk = SchemaWalker::new(dialect.as_mut())
        .walk(target, &mut reporter)
        .await
        .with_context(|| format!("Schema walk of '{}' failed", target))?;

    let failed = walk.failed_tables();
    if failed > 0 {
        warn!(
            "{} of {} tables could not be described",
            failed,
            walk.tables.len()
        );
    }

    Ok(())
}
