//! # Rollbook DB
//!
//! Connection pool setup, the embedded migration set, and rendering of
//! [`rollbook_core::ListQuery`] values into SQL.
//!
//! # Example
//!
//! ```ignore
//! use rollbook_db::{init_db_pool, MIGRATOR};
//!
//! let pool = init_db_pool().await?;
//! MIGRATOR.run(&pool).await?;
//! ```

pub mod filter;

use std::env;

use anyhow::Context;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub use sqlx::PgPool;

/// Schema migrations, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Connects to `DATABASE_URL` with at most `DATABASE_MAX_CONNECTIONS`
/// (default 10) pooled connections.
pub async fn init_db_pool() -> anyhow::Result<PgPool> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    info!(max_connections, "Database pool ready");
    Ok(pool)
}

/// Applies pending migrations.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Failed to run database migrations")
}
