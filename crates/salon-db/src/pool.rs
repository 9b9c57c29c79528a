//! # Database Handle
//!
//! Connection setup, lifecycle bootstrap and repository access.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Lifecycle                                 │
//! │                                                                         │
//! │  DbConfig::from_env() / DbConfig::new(path) / DbConfig::in_memory()    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::bootstrap(config, seed_source).await                        │
//! │       │                                                                 │
//! │       ├── open the connection (foreign_keys = ON)                      │
//! │       ├── ensure_schema()      ← six tables, IF NOT EXISTS             │
//! │       └── spawn_seed().wait()  ← only when `customers` is empty        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ready: every repository sees a fully seeded store                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.customers() / db.employees() / db.tally() / ...                    │
//! │  (each repository holds a clone of the same handle)                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Connection
//! The store is a single local file used by a single process. The pool is
//! capped at one connection by default, so every statement runs on the same
//! SQLite session and SQLite serializes writes itself.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::appointment::AppointmentRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::employee::EmployeeRepository;
use crate::repository::product::ProductRepository;
use crate::repository::service::ServiceRepository;
use crate::repository::tally::TallyRepository;
use crate::seed::{self, SeedHandle, SeedOutcome, SeedSource};

// =============================================================================
// Configuration
// =============================================================================

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "salon.db";

/// Environment variable overriding [`DEFAULT_DATABASE_PATH`].
pub const DATABASE_PATH_ENV: &str = "SALON_DB_PATH";

const IN_MEMORY_PATH: &str = ":memory:";

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("./data/salon.db")
///     .connect_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections.
    /// Default: 1 (one connection per process)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for the connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing the connection.
    /// Default: none (the connection lives as long as the process)
    pub idle_timeout: Option<Duration>,

    /// Whether to create missing tables on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a configuration for the given database file.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    /// Reads the database path from `SALON_DB_PATH`, falling back to
    /// `salon.db` in the working directory.
    pub fn from_env() -> Self {
        match std::env::var(DATABASE_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => DbConfig::new(path),
            _ => DbConfig::new(DEFAULT_DATABASE_PATH),
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to create missing tables on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Every call yields an isolated database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    /// True when this configuration points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY_PATH)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                // Readers don't block the writer
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        // Off by default in SQLite
        Ok(options.foreign_keys(true))
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig::new(DEFAULT_DATABASE_PATH)
    }
}

// =============================================================================
// Database
// =============================================================================

/// The process-wide store handle.
///
/// Cheap to clone; all clones share the one connection. Repositories are
/// handed out by value and hold their own clone, so nothing here is global
/// state and tests can run any number of isolated in-memory instances.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database and, if enabled, creates the schema.
    ///
    /// Does **not** seed. Use [`Database::bootstrap`] for the full startup
    /// sequence.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = config.connect_options()?;

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);

        if config.is_in_memory() {
            // Recycling the connection would drop the in-memory database
            pool_options = pool_options.max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Database connection opened");

        let db = Database { pool };

        if config.run_migrations {
            db.ensure_schema().await?;
        }

        Ok(db)
    }

    /// Full startup: open, create schema, seed if empty, then return.
    ///
    /// Seeding completes before this returns, so the first read after
    /// bootstrap never observes a half-seeded store.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let (db, outcome) = Database::bootstrap(DbConfig::from_env(), SeedData::demo()?).await?;
    /// let customers = db.customers().get_all().await?;
    /// ```
    pub async fn bootstrap<S: SeedSource>(
        config: DbConfig,
        source: S,
    ) -> DbResult<(Self, SeedOutcome)> {
        let db = Database::new(config.run_migrations(true)).await?;
        let outcome = db.spawn_seed(source).wait().await?;
        info!(?outcome, "Database ready");
        Ok((db, outcome))
    }

    /// Creates any missing tables. Idempotent.
    pub async fn ensure_schema(&self) -> DbResult<()> {
        migrations::ensure_schema(&self.pool).await
    }

    /// Seeds the store from `source` if, and only if, `customers` is empty.
    pub async fn seed_if_empty<S: SeedSource + ?Sized>(&self, source: &S) -> DbResult<SeedOutcome> {
        seed::seed_if_empty(self, source).await
    }

    /// Runs [`Database::seed_if_empty`] as a background task.
    ///
    /// The returned handle must be awaited before the store is considered
    /// ready.
    pub fn spawn_seed<S: SeedSource>(&self, source: S) -> SeedHandle {
        let db = self.clone();
        SeedHandle::new(tokio::spawn(async move {
            seed::seed_if_empty(&db, &source).await
        }))
    }

    /// Returns a reference to the connection pool.
    ///
    /// For ad hoc queries not covered by repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    pub fn employees(&self) -> EmployeeRepository {
        EmployeeRepository::new(self.pool.clone())
    }

    pub fn services(&self) -> ServiceRepository {
        ServiceRepository::new(self.pool.clone())
    }

    pub fn appointments(&self) -> AppointmentRepository {
        AppointmentRepository::new(self.pool.clone())
    }

    /// Returns the tally (point-of-sale) repository.
    pub fn tally(&self) -> TallyRepository {
        TallyRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Closes the connection.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
