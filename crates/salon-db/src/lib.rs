//! # salon-db: Persistence Layer for the Salon Store
//!
//! This crate owns the salon's local SQLite store: schema, first-run seed,
//! and one repository per entity. It uses sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Salon Store Data Flow                            │
//! │                                                                         │
//! │  Application (bookings screen, POS counter, ...)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     salon-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ customer.rs   │    │  (embedded)  │  │   │
//! │  │   │               │    │ employee.rs   │    │              │  │   │
//! │  │   │ bootstrap()   │◄───│ service.rs    │    │ 001_initial_ │  │   │
//! │  │   │ one connection│    │ appointment.rs│    │   schema.sql │  │   │
//! │  │   │               │    │ tally.rs      │    │              │  │   │
//! │  │   │   seed.rs     │    │ product.rs    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./salon.db  (or $SALON_DB_PATH)                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Configuration, the store handle and the bootstrap sequence
//! - [`migrations`] - Embedded schema
//! - [`seed`] - First-run seeding
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use salon_db::{Database, DbConfig, SeedData};
//!
//! let (db, _outcome) = Database::bootstrap(DbConfig::from_env(), SeedData::demo()?).await?;
//!
//! let customers = db.customers().get_all().await?;
//! let sales = db.tally().get_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

#[cfg(test)]
mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DATABASE_PATH_ENV, DEFAULT_DATABASE_PATH};
pub use seed::{JsonSeedFile, SeedData, SeedHandle, SeedOutcome, SeedSource};

// Repository re-exports for convenience
pub use repository::appointment::AppointmentRepository;
pub use repository::customer::CustomerRepository;
pub use repository::employee::EmployeeRepository;
pub use repository::generate_id;
pub use repository::product::ProductRepository;
pub use repository::service::ServiceRepository;
pub use repository::tally::TallyRepository;
