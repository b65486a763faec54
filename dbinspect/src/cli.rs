//! Command-line interface definition.

use clap::{ArgGroup, Args, Parser, ValueEnum};
use dbinspect_core::DatabaseType;
use std::path::{Path, PathBuf};

/// Env file loaded when `--env-file` is not given
pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Parser, Debug)]
#[command(name = "dbinspect")]
#[command(about = "Print databases, tables and column definitions of a MySQL or PostgreSQL server")]
#[command(version)]
#[command(long_about = "
dbinspect - read-only schema inspector

Connects with the credentials in DBHOST, DBPORT, DBUSER, DBPASSWORD and
DBNAME (read from the environment and from a .env file), lists the server's
databases, selects DBNAME, lists its tables and prints each table's columns.

EXAMPLES:
  dbinspect --mysql
  dbinspect --backend postgres --schema billing
  dbinspect --psql --env-file /etc/dbinspect/prod.env
")]
#[command(group(
    ArgGroup::new("backend_selector")
        .required(true)
        .args(["backend", "mysql", "psql"])
))]
pub struct Cli {
    /// Database backend to inspect
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Shorthand for --backend mysql
    #[arg(long)]
    pub mysql: bool,

    /// Shorthand for --backend postgres
    #[arg(long)]
    pub psql: bool,

    /// Env file with DB* variables (process environment takes precedence)
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// PostgreSQL schema for search_path [default: $DBSCHEMA or public]
    #[arg(long)]
    pub schema: Option<String>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Supported backends
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// MySQL or MariaDB
    #[value(alias = "mariadb")]
    Mysql,
    /// PostgreSQL
    #[value(alias = "postgresql", alias = "psql")]
    Postgres,
}

impl From<Backend> for DatabaseType {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Mysql => Self::MySQL,
            Backend::Postgres => Self::PostgreSQL,
        }
    }
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    pub quiet: bool,
}

impl Cli {
    /// The selected backend. The argument group guarantees exactly one source.
    pub fn database_type(&self) -> DatabaseType {
        match (self.backend, self.mysql) {
            (Some(backend), _) => backend.into(),
            (None, true) => DatabaseType::MySQL,
            (None, false) => DatabaseType::PostgreSQL,
        }
    }

    /// Env file path and whether its absence is an error.
    pub fn env_file(&self) -> (&Path, bool) {
        match &self.env_file {
            Some(path) => (path.as_path(), true),
            None => (Path::new(DEFAULT_ENV_FILE), false),
        }
    }
}
