//! # Seed Loader CLI
//!
//! Creates the salon database (if needed) and seeds it on first run.
//!
//! ## Usage
//! ```bash
//! # Seed ./salon.db (or $SALON_DB_PATH) with the bundled demo data
//! cargo run -p salon-db --bin seed
//!
//! # Specify database path
//! cargo run -p salon-db --bin seed -- --db ./data/salon.db
//!
//! # Seed from your own document
//! cargo run -p salon-db --bin seed -- --seed-file ./my-salon.json
//! ```
//!
//! Running it again against a database that already has customers changes
//! nothing.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use salon_db::{Database, DbConfig, JsonSeedFile, SeedData, SeedOutcome, SeedSource};

#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(about = "Create and seed the salon database", long_about = None)]
struct Args {
    /// Database file path (default: $SALON_DB_PATH, then ./salon.db)
    #[arg(short, long)]
    db: Option<PathBuf>,

    /// JSON seed document with customers, employees, services and products
    #[arg(short, long)]
    seed_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();

    let config = match args.db {
        Some(path) => DbConfig::new(path),
        None => DbConfig::from_env(),
    };

    println!("🌱 Salon Store Seed Loader");
    println!("==========================");
    println!("Database: {}", config.database_path.display());

    // The file is only read if the store turns out to be empty.
    let source: Box<dyn SeedSource> = match args.seed_file {
        Some(path) => {
            let file = JsonSeedFile::new(path);
            println!("Seed:     {}", file.path().display());
            Box::new(file)
        }
        None => {
            println!("Seed:     bundled demo data");
            Box::new(SeedData::demo()?)
        }
    };
    println!();

    let (db, outcome) = Database::bootstrap(config, source).await?;

    println!("✓ Connected to database");
    println!("✓ Schema ready");

    match outcome {
        SeedOutcome::Seeded {
            customers,
            employees,
            services,
            products,
        } => {
            println!("✓ Seeded {} customers", customers);
            println!("✓ Seeded {} employees", employees);
            println!("✓ Seeded {} services", services);
            println!("✓ Seeded {} products", products);
        }
        SeedOutcome::Skipped { existing_customers } => {
            println!("⚠ Database already has {} customers", existing_customers);
            println!("  Skipping seed to avoid duplicates.");
            println!("  Delete the database file to reseed.");
        }
    }

    println!();
    println!("Row counts:");
    println!("  customers     {}", db.customers().count().await?);
    println!("  employees     {}", db.employees().count().await?);
    println!("  services      {}", db.services().count().await?);
    println!("  appointments  {}", db.appointments().count().await?);
    println!("  tally_items   {}", db.tally().count().await?);
    println!("  products      {}", db.products().count().await?);

    db.close().await;

    Ok(())
}

/// Log level comes from `RUST_LOG`, defaulting to debug for the salon
/// crates and warnings only from sqlx.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,salon=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
