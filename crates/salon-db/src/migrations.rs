//! # Schema Management
//!
//! Embedded SQL migrations for the salon store.
//!
//! ## How Schema Setup Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ensure_schema()                                    │
//! │                                                                         │
//! │  PRAGMA foreign_keys = ON   ← before any write on this connection      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table (created on first run)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  001_initial_schema.sql  ── CREATE TABLE IF NOT EXISTS × 6             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Schema ready (no-op on every later start)                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. Write idempotent SQL (use `IF NOT EXISTS` where possible)
//! 4. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Every table the schema declares, in dependency order.
pub const TABLES: [&str; 6] = [
    "customers",
    "employees",
    "services",
    "appointments",
    "tally_items",
    "products",
];

/// Creates any missing tables and turns on foreign-key enforcement.
///
/// ## Safety
/// - Idempotent: safe to call on every process start
/// - Existing rows are never touched
pub async fn ensure_schema(pool: &SqlitePool) -> DbResult<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    MIGRATOR.run(pool).await?;

    info!(tables = TABLES.len(), "Database schema ready");
    Ok(())
}

/// Returns `(embedded_migrations, applied_migrations)` for diagnostics.
///
/// A database that never ran the migrator reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let tracked: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations')",
    )
    .fetch_one(pool)
    .await?;

    if !tracked {
        return Ok((total, 0));
    }

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name <> '_sqlx_migrations' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_creates_all_six_tables() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut expected: Vec<String> = TABLES.iter().map(|t| t.to_string()).collect();
        expected.sort();

        assert_eq!(table_names(db.pool()).await, expected);
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        ensure_schema(db.pool()).await.unwrap();
        ensure_schema(db.pool()).await.unwrap();

        assert_eq!(table_names(db.pool()).await.len(), TABLES.len());
        assert_eq!(migration_status(db.pool()).await.unwrap(), (1, 1));
    }

    #[tokio::test]
    async fn test_status_before_migrations_reports_none_applied() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        assert_eq!(migration_status(db.pool()).await.unwrap(), (1, 0));
    }

    #[tokio::test]
    async fn test_status_surfaces_store_errors() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(migration_status(db.pool()).await.is_err());
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();

        assert_eq!(enabled, 1);
    }
}
