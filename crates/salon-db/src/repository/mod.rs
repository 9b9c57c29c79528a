//! # Repository Module
//!
//! One repository per table.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Shape (per entity E)                      │
//! │                                                                         │
//! │  db.customers()                                                        │
//! │  ├── get_all()            → Vec<E>       (fixed ORDER BY)              │
//! │  ├── get_by_id(id)        → Option<E>    (None is not an error)        │
//! │  ├── create(NewE)         → E            (ids + defaults filled in)    │
//! │  ├── update(id, EPatch)   → ()           (only Some fields written)    │
//! │  ├── delete(id)           → ()           (hard delete, no cascade)     │
//! │  ├── insert(&E)           → ()           (shared with the seed loader) │
//! │  └── count()              → i64                                         │
//! │       │                                                                 │
//! │       │  one SQL statement per call                                     │
//! │       ▼                                                                 │
//! │  SQLite                                                                │
//! │                                                                         │
//! │  Row ⇄ record translation:                                             │
//! │  • list fields   ⇄ JSON text  (NULL / '' read back as [])              │
//! │  • bool fields   ⇄ INTEGER 0/1                                         │
//! │  • enums         ⇄ lowercase TEXT                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`](customer::CustomerRepository)
//! - [`EmployeeRepository`](employee::EmployeeRepository)
//! - [`ServiceRepository`](service::ServiceRepository)
//! - [`AppointmentRepository`](appointment::AppointmentRepository)
//! - [`TallyRepository`](tally::TallyRepository)
//! - [`ProductRepository`](product::ProductRepository)

pub mod appointment;
pub mod customer;
pub mod employee;
pub mod product;
pub mod service;
pub mod tally;

mod update;

pub(crate) use update::UpdateStatement;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Generates `<prefix>-<uuid v4>`.
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

/// Encodes a list field for its TEXT column.
pub(crate) fn encode_list<T: Serialize>(column: &'static str, items: &[T]) -> DbResult<String> {
    serde_json::to_string(items).map_err(|e| DbError::json(column, e))
}

/// Decodes a list column. NULL and blank text both read as an empty list.
pub(crate) fn decode_list<T: DeserializeOwned>(
    column: &'static str,
    raw: Option<String>,
) -> DbResult<Vec<T>> {
    match raw {
        Some(text) if !text.trim().is_empty() => {
            serde_json::from_str(&text).map_err(|e| DbError::json(column, e))
        }
        _ => Ok(Vec::new()),
    }
}

/// `DELETE FROM <table> WHERE id = ?`. Zero affected rows is fine.
pub(crate) async fn delete_row(pool: &SqlitePool, table: &'static str, id: &str) -> DbResult<u64> {
    let sql = format!("DELETE FROM {table} WHERE id = ?1");
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(result.rows_affected())
}

pub(crate) async fn count_rows(pool: &SqlitePool, table: &'static str) -> DbResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    Ok(count)
}
