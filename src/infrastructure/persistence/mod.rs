//! SQLite persistence for short links.
//!
//! - [`SqliteLinkRepository`] - Link storage and retrieval
//! - [`connect`] - Pool creation with embedded migrations applied

pub mod sqlite_link_repository;

pub use sqlite_link_repository::SqliteLinkRepository;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Opens a connection pool and runs the embedded migrations.
///
/// The database file is created if it does not exist.
///
/// # Errors
///
/// Returns an error if the URL is malformed, the database can't be opened, or a
/// migration fails.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL '{}'", database_url))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("Failed to open database")?;

    migrate(&pool).await?;

    Ok(pool)
}

/// Applies the embedded migrations from `./migrations`.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    Ok(())
}
