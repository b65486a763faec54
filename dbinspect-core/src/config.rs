//! Connection parameters sourced from the process environment.
//!
//! # Security
//! The password is held in a `Zeroizing` container and is omitted from
//! `Debug` and `Display` output.

use std::path::Path;
use zeroize::Zeroizing;

/// Environment variable holding the server host
pub const ENV_HOST: &str = "DBHOST";
/// Environment variable holding the server port
pub const ENV_PORT: &str = "DBPORT";
/// Environment variable holding the user name
pub const ENV_USER: &str = "DBUSER";
/// Environment variable holding the password
pub const ENV_PASSWORD: &str = "DBPASSWORD";
/// Environment variable holding the target database name
pub const ENV_NAME: &str = "DBNAME";
/// Environment variable holding the PostgreSQL schema for `search_path`
pub const ENV_SCHEMA: &str = "DBSCHEMA";

/// Schema used for PostgreSQL when `DBSCHEMA` is not set
pub const DEFAULT_SCHEMA: &str = "public";

/// Connection parameters, read once at startup and immutable afterwards.
#[derive(Clone, Default)]
pub struct ConnectionParameters {
    /// Server host name or address
    pub host: String,
    /// Server port, kept as text until the connection is opened
    pub port: String,
    /// User name
    pub user: String,
    password: Zeroizing<String>,
    /// Target database name
    pub database: String,
}

impl ConnectionParameters {
    /// Creates parameters from explicit values.
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            user: user.into(),
            password: Zeroizing::new(password.into()),
            database: database.into(),
        }
    }

    /// Reads `DBHOST`, `DBPORT`, `DBUSER`, `DBPASSWORD` and `DBNAME`.
    ///
    /// Missing or non-unicode values resolve to an empty string; this never
    /// fails. A bad value surfaces when the connection is opened.
    pub fn from_env() -> Self {
        Self::new(
            env_or_empty(ENV_HOST),
            env_or_empty(ENV_PORT),
            env_or_empty(ENV_USER),
            env_or_empty(ENV_PASSWORD),
            env_or_empty(ENV_NAME),
        )
    }

    /// The password. Callers must not log it.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Whether a non-empty password was supplied
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// Parses the port, returning `None` when it is empty.
    ///
    /// # Errors
    /// Returns a configuration error if the port is not a valid non-zero `u16`
    pub fn port_number(&self) -> crate::Result<Option<u16>> {
        let port = self.port.trim();
        if port.is_empty() {
            return Ok(None);
        }
        match port.parse::<u16>() {
            Ok(0) | Err(_) => Err(crate::InspectError::configuration(format!(
                "{} must be a port number between 1 and 65535, got '{}'",
                ENV_PORT, port
            ))),
            Ok(number) => Ok(Some(number)),
        }
    }
}

impl std::fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for ConnectionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.host)?;
        if !self.port.is_empty() {
            write!(f, ":{}", self.port)?;
        }
        write!(f, "/{}", self.database)
        // User and password intentionally omitted
    }
}

/// Reads the PostgreSQL schema name from `DBSCHEMA`, defaulting to `public`.
pub fn schema_from_env() -> String {
    std::env::var(ENV_SCHEMA)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SCHEMA.to_string())
}

fn env_or_empty(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

/// Loads variables from an env file into the process environment.
///
/// Existing process variables are not overridden. When `required` is false a
/// missing file is skipped with a warning; any other failure is a
/// configuration error.
///
/// # Returns
/// `true` if the file was found and loaded
///
/// # Errors
/// Returns an error if the file cannot be read (and is required) or fails to
/// parse
pub fn load_env_file(path: &Path, required: bool) -> crate::Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Ok(true)
        }
        Err(e) if !required && e.not_found() => {
            tracing::warn!(
                "No environment file at {}, using the process environment only",
                path.display()
            );
            Ok(false)
        }
        Err(e) => Err(crate::InspectError::configuration(format!(
            "Error loading {} file: {}",
            path.display(),
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_reads_all_variables() {
        temp_env::with_vars(
            vec![
                (ENV_HOST, Some("db.internal")),
                (ENV_PORT, Some("5433")),
                (ENV_USER, Some("inspector")),
                (ENV_PASSWORD, Some("s3cret")),
                (ENV_NAME, Some("appdb")),
            ],
            || {
                let params = ConnectionParameters::from_env();
                assert_eq!(params.host, "db.internal");
                assert_eq!(params.port, "5433");
                assert_eq!(params.user, "inspector");
                assert_eq!(params.password(), "s3cret");
                assert_eq!(params.database, "appdb");
            },
        );
    }

    #[test]
    fn test_from_env_missing_values_are_empty() {
        temp_env::with_vars_unset(
            vec![ENV_HOST, ENV_PORT, ENV_USER, ENV_PASSWORD, ENV_NAME],
            || {
                let params = ConnectionParameters::from_env();
                assert!(params.host.is_empty());
                assert!(params.port.is_empty());
                assert!(params.user.is_empty());
                assert!(!params.has_password());
                assert!(params.database.is_empty());
            },
        );
    }

    #[test]
    fn test_schema_from_env_default() {
        temp_env::with_var_unset(ENV_SCHEMA, || {
            assert_eq!(schema_from_env(), DEFAULT_SCHEMA);
        });
        temp_env::with_var(ENV_SCHEMA, Some("billing"), || {
            assert_eq!(schema_from_env(), "billing");
        });
    }

    #[test]
    fn test_port_number() {
        let mut params = ConnectionParameters::new("h", "", "u", "p", "d");
        assert_eq!(params.port_number().ok(), Some(None));

        params.port = "3307".to_string();
        assert_eq!(params.port_number().ok(), Some(Some(3307)));

        params.port = "0".to_string();
        assert!(params.port_number().is_err());

        params.port = "not-a-port".to_string();
        assert!(params.port_number().is_err());
    }

    #[test]
    fn test_debug_and_display_hide_credentials() {
        let params = ConnectionParameters::new("example.com", "5432", "admin", "hunter2", "appdb");

        let debug = format!("{:?}", params);
        assert!(debug.contains("example.com"));
        assert!(!debug.contains("hunter2"));

        let display = params.to_string();
        assert_eq!(display, "example.com:5432/appdb");
        assert!(!display.contains("admin"));
        assert!(!display.contains("hunter2"));
    }

    #[test]
    fn test_load_env_file_missing() {
        let path = Path::new("/nonexistent/dbinspect/.env");
        assert_eq!(load_env_file(path, false).ok(), Some(false));
        assert!(load_env_file(path, true).is_err());
    }

    /// Shared in-memory sink for captured log output.
    #[derive(Clone, Default)]
    struct Capture(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0
                .lock()
                .map_err(|_| std::io::Error::other("capture lock poisoned"))?
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn contents(&self) -> String {
            self.0
                .lock()
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .unwrap_or_default()
        }
    }

    #[test]
    fn test_missing_default_env_file_is_warned() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let path = Path::new("/nonexistent/dbinspect/.env");
        let loaded = tracing::subscriber::with_default(subscriber, || load_env_file(path, false));

        assert_eq!(loaded.ok(), Some(false));
        let output = capture.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("No environment file at /nonexistent/dbinspect/.env"));
    }
}
