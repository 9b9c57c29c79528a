//! # Seed Loader
//!
//! First-run population of an empty store.
//!
//! ## Seeding Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        seed_if_empty()                                  │
//! │                                                                         │
//! │  SELECT COUNT(*) FROM customers                                        │
//! │       │                                                                 │
//! │       ├── > 0  ──► SeedOutcome::Skipped  (source never loaded)         │
//! │       │                                                                 │
//! │       ▼  = 0                                                            │
//! │  source.load()  ──► SeedData { customers, employees, services, products }│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert every record as-is (ids and timestamps kept)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SeedOutcome::Seeded { counts }                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The customers table is the only emptiness signal. A store with staff but
//! no customers is seeded again.
//!
//! Inserts are not wrapped in a transaction. If one fails partway, the rows
//! already written stay, and once any customer is in the store later starts
//! skip seeding. Recovering from a half-seeded store means deleting the
//! database file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use salon_core::{Customer, Employee, Product, Service};

/// Bundled demo dataset.
const DEMO_SEED: &str = include_str!("../../../seed/demo.json");

// =============================================================================
// Seed Data
// =============================================================================

/// The four lists a seed source provides. Appointments and tally items are
/// never seeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl SeedData {
    /// Parses a seed document.
    ///
    /// Records without `createdAt`/`updatedAt` are stamped with the parse
    /// time; employees without `email`/`phone` get empty strings.
    pub fn from_json(json: &str) -> DbResult<Self> {
        serde_json::from_str(json).map_err(|e| DbError::SeedSource(e.to_string()))
    }

    /// The small demo dataset shipped with the crate.
    pub fn demo() -> DbResult<Self> {
        SeedData::from_json(DEMO_SEED)
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
            && self.employees.is_empty()
            && self.services.is_empty()
            && self.products.is_empty()
    }
}

// =============================================================================
// Seed Sources
// =============================================================================

/// Supplies the initial dataset.
///
/// Only consulted when the store is empty.
pub trait SeedSource: Send + Sync + 'static {
    fn load(&self) -> DbResult<SeedData>;
}

impl<S: SeedSource + ?Sized> SeedSource for Box<S> {
    fn load(&self) -> DbResult<SeedData> {
        (**self).load()
    }
}

impl SeedSource for SeedData {
    fn load(&self) -> DbResult<SeedData> {
        Ok(self.clone())
    }
}

/// A seed document on disk, read lazily at seeding time.
#[derive(Debug, Clone)]
pub struct JsonSeedFile {
    path: PathBuf,
}

impl JsonSeedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonSeedFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeedSource for JsonSeedFile {
    fn load(&self) -> DbResult<SeedData> {
        debug!(path = %self.path.display(), "Reading seed file");

        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            DbError::SeedSource(format!("{}: {}", self.path.display(), e))
        })?;

        SeedData::from_json(&json)
    }
}

// =============================================================================
// Outcome and Task Handle
// =============================================================================

/// What a seeding attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already had customers; nothing was written.
    Skipped { existing_customers: i64 },

    /// The seed records were inserted.
    Seeded {
        customers: usize,
        employees: usize,
        services: usize,
        products: usize,
    },
}

impl SeedOutcome {
    pub fn was_seeded(&self) -> bool {
        matches!(self, SeedOutcome::Seeded { .. })
    }
}

/// A seeding run in progress.
///
/// The store is ready once [`SeedHandle::wait`] returns `Ok`.
#[derive(Debug)]
pub struct SeedHandle {
    task: JoinHandle<DbResult<SeedOutcome>>,
}

impl SeedHandle {
    pub(crate) fn new(task: JoinHandle<DbResult<SeedOutcome>>) -> Self {
        SeedHandle { task }
    }

    /// Waits for seeding to finish and returns its outcome.
    pub async fn wait(self) -> DbResult<SeedOutcome> {
        self.task
            .await
            .map_err(|e| DbError::Internal(format!("Seed task failed: {}", e)))?
    }
}

// =============================================================================
// Seeding
// =============================================================================

/// Inserts the source's records if, and only if, `customers` is empty.
pub async fn seed_if_empty<S: SeedSource + ?Sized>(
    db: &Database,
    source: &S,
) -> DbResult<SeedOutcome> {
    let existing_customers = db.customers().count().await?;
    if existing_customers > 0 {
        info!(existing_customers, "Store already populated, skipping seed");
        return Ok(SeedOutcome::Skipped { existing_customers });
    }

    let data = source.load()?;

    let customers = db.customers();
    for customer in &data.customers {
        customers.insert(customer).await?;
    }

    let employees = db.employees();
    for employee in &data.employees {
        employees.insert(employee).await?;
    }

    let services = db.services();
    for service in &data.services {
        services.insert(service).await?;
    }

    let products = db.products();
    for product in &data.products {
        products.insert(product).await?;
    }

    let outcome = SeedOutcome::Seeded {
        customers: data.customers.len(),
        employees: data.employees.len(),
        services: data.services.len(),
        products: data.products.len(),
    };

    info!(?outcome, "Seed data inserted");
    Ok(outcome)
}

// =============================================================================
// Unit Tests
// =============================================================================
