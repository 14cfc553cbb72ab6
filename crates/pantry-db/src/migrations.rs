//! # Schema Migrations
//!
//! The inventory schema lives in `migrations/sqlite/` as numbered SQL files
//! and is baked into the binary with `sqlx::migrate!`, so a fresh database
//! file bootstraps itself on first open with no files to ship alongside.
//!
//! Migrations are append-only: a shipped file is never edited, a schema
//! change gets the next `NNN_description.sql` number. sqlx records checksums
//! in `_sqlx_migrations` and refuses to start if an applied file was
//! tampered with, which is exactly the behavior we want for ledger data.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Brings the database up to the latest schema version.
///
/// Each pending migration runs in its own transaction, in filename order.
/// Safe to call on every startup; a fully migrated database is a no-op.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(
        embedded = MIGRATOR.migrations.len(),
        "Running pending migrations"
    );

    MIGRATOR.run(pool).await?;

    info!("Database schema is up to date");
    Ok(())
}

/// Counts embedded vs. applied migrations, for health checks.
///
/// A missing `_sqlx_migrations` table reads as zero applied, which is
/// the truthful answer for a database that was never migrated.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((embedded, applied as usize))
}
