//! Store configuration.
//!
//! Configuration is read once at process start from environment variables
//! with fallback to defaults. A `.env` file in the working directory is
//! loaded first; variables already set in the process win over it. The connection string itself is never validated
//! here: an absent or malformed `DATABASE_URL` produces a [`Database`] that
//! fails with `ConnectionFailure` on first use.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | none |
//! | `DATABASE_MAX_CONNECTIONS` | 5 |
//! | `DATABASE_ACQUIRE_TIMEOUT_SECS` | 30 |
//! | `DATABASE_FOREIGN_KEYS` | false |
//!
//! [`Database`]: crate::pool::Database

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const DATABASE_ACQUIRE_TIMEOUT_SECS: &str = "DATABASE_ACQUIRE_TIMEOUT_SECS";
pub const DATABASE_FOREIGN_KEYS: &str = "DATABASE_FOREIGN_KEYS";

/// Connection string used by [`DbConfig::in_memory`].
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("sqlite://./hyggy.db?mode=rwc")
///     .max_connections(10)
///     .foreign_keys(true);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Connection string, e.g. `sqlite://./hyggy.db?mode=rwc`.
    pub database_url: Option<String>,

    /// Upper bound on concurrently open connections.
    /// Default: 5
    pub max_connections: u32,

    /// How long an operation waits for a free connection.
    /// Default: 30 seconds
    pub acquire_timeout: Duration,

    /// Idle connections are closed after this long. `None` keeps them open,
    /// which an in-memory database needs to keep its data.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Let the engine enforce REFERENCES clauses.
    /// Default: false (dangling references are representable)
    pub foreign_keys: bool,
}

/// Defaults with no connection string at all.
impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            database_url: None,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            foreign_keys: false,
        }
    }
}

impl DbConfig {
    /// Creates a configuration for the given connection string.
    pub fn new(url: impl Into<String>) -> Self {
        DbConfig {
            database_url: Some(url.into()),
            ..DbConfig::default()
        }
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(&DbConfig::in_memory());
    /// schema::bootstrap(&db).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_url: Some(IN_MEMORY_URL.to_string()),
            max_connections: 1, // In-memory requires single connection
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: None,
            foreign_keys: false,
        }
    }

    /// Loads configuration from the process environment after reading
    /// `.env` (if there is one).
    ///
    /// A missing `.env` is not an error, and neither is a missing
    /// `DATABASE_URL`: the handle built from it fails on first use.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from the given `.env` file, with process
    /// variables taking precedence over the file.
    ///
    /// Unlike [`from_env`](Self::from_env) the file must exist and parse.
    /// The process environment is left unchanged.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file_error = |e: dotenv::Error| ConfigError::EnvFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let file: HashMap<String, String> = dotenv::from_path_iter(path)
            .map_err(file_error)?
            .collect::<Result<_, _>>()
            .map_err(file_error)?;

        Self::from_lookup(|key| env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DbConfig::default();

        Ok(DbConfig {
            database_url: lookup(DATABASE_URL).filter(|url| !url.trim().is_empty()),

            max_connections: match lookup(DATABASE_MAX_CONNECTIONS) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ConfigError::InvalidValue(DATABASE_MAX_CONNECTIONS.to_string()))?,
                None => defaults.max_connections,
            },

            acquire_timeout: match lookup(DATABASE_ACQUIRE_TIMEOUT_SECS) {
                Some(raw) => raw.trim().parse().map(Duration::from_secs).map_err(|_| {
                    ConfigError::InvalidValue(DATABASE_ACQUIRE_TIMEOUT_SECS.to_string())
                })?,
                None => defaults.acquire_timeout,
            },

            idle_timeout: defaults.idle_timeout,

            foreign_keys: match lookup(DATABASE_FOREIGN_KEYS) {
                Some(raw) => parse_flag(&raw)
                    .ok_or_else(|| ConfigError::InvalidValue(DATABASE_FOREIGN_KEYS.to_string()))?,
                None => defaults.foreign_keys,
            },
        })
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the acquire timeout.
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Sets whether the engine enforces foreign keys.
    pub fn foreign_keys(mut self, enforce: bool) -> Self {
        self.foreign_keys = enforce;
        self
    }

    /// True when the connection string names SQLite's in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_url
            .as_deref()
            .is_some_and(|url| url.contains(":memory:") || url.contains("mode=memory"))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Cannot read env file {path}: {reason}")]
    EnvFile { path: String, reason: String },
}
