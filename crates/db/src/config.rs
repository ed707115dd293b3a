//! Store configuration loaded from environment variables.

use std::str::FromStr;

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://campus.db";

/// Default upper bound on pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Connection settings for the relational store.
///
/// An in-memory URL (`sqlite::memory:`) gives every pooled connection its
/// own database, so pair it with `max_connections = 1`.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Create the database file when it does not exist yet.
    pub create_if_missing: bool,
}

impl DbConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default              |
    /// |------------------------|----------------------|
    /// | `DATABASE_URL`         | `sqlite://campus.db` |
    /// | `DB_MAX_CONNECTIONS`   | `5`                  |
    /// | `DB_CREATE_IF_MISSING` | `true`               |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let max_connections = parse_or(
            &lookup,
            "DB_MAX_CONNECTIONS",
            "a positive integer",
            DEFAULT_MAX_CONNECTIONS,
        )?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                expected: "a positive integer",
                value: "0".into(),
            });
        }

        let create_if_missing = parse_or(&lookup, "DB_CREATE_IF_MISSING", "true or false", true)?;

        Ok(Self {
            database_url,
            max_connections,
            create_if_missing,
        })
    }
}

fn parse_or<F, T>(
    lookup: &F,
    var: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            expected,
            value: raw,
        }),
    }
}
