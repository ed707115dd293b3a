//! Data-access layer for the campus records system.
//!
//! Record services ([`repositories`]) sit on top of three shared pieces:
//! the key allocator ([`keys`]), the criteria compiler ([`search`]) and
//! commit-or-rollback plumbing. Every failure surfaces as a [`ModelError`].

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod config;
pub mod conflict;
pub mod error;
pub mod keys;
pub mod models;
pub mod repositories;
pub mod search;
mod tx;

pub use config::{ConfigError, DbConfig};
pub use error::{ModelError, ModelResult};
pub use search::paginate;

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from configuration.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(config.create_if_missing);
    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Round-trip a trivial query to confirm the store is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the bundled schema in `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
