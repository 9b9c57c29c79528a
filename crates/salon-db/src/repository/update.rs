//! # Sparse UPDATE Builder
//!
//! Turns a typed patch into one parameterized statement.
//!
//! ```text
//! CustomerPatch { notes: Some(Some("VIP")), visit_count: Some(4), ..None }
//!       │
//!       ▼
//! UPDATE customers SET notes = ?, visit_count = ?, updated_at = ? WHERE id = ?
//! ```
//!
//! `None` fields never reach the SQL, so their columns keep whatever they
//! held. `updated_at` is always written, which makes an all-`None` patch a
//! valid "touch". A `Some(None)` field is an assignment like any other and
//! writes NULL.

use chrono::Utc;
use serde::Serialize;
use sqlx::{Encode, QueryBuilder, Sqlite, SqlitePool, Type};

use crate::error::DbResult;
use crate::repository::encode_list;

pub(crate) struct UpdateStatement<'args> {
    builder: QueryBuilder<'args, Sqlite>,
    assignments: usize,
}

impl<'args> UpdateStatement<'args> {
    pub(crate) fn new(table: &'static str) -> Self {
        UpdateStatement {
            builder: QueryBuilder::new(format!("UPDATE {table} SET ")),
            assignments: 0,
        }
    }

    /// Appends `column = ?` when `value` is present.
    pub(crate) fn set<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Sqlite> + Type<Sqlite>,
    {
        if let Some(value) = value {
            self.builder.push(column).push(" = ").push_bind(value).push(", ");
            self.assignments += 1;
        }
        self
    }

    /// Like [`set`](Self::set) for list fields, storing them as JSON text.
    pub(crate) fn set_json<T: Serialize>(
        &mut self,
        column: &'static str,
        value: Option<&[T]>,
    ) -> DbResult<&mut Self> {
        let encoded = value.map(|items| encode_list(column, items)).transpose()?;
        Ok(self.set(column, encoded))
    }

    /// Number of patch fields that made it into the statement.
    pub(crate) fn assignments(&self) -> usize {
        self.assignments
    }

    /// Stamps `updated_at`, targets `id`, and runs the statement.
    ///
    /// Returns the affected row count (0 when the id doesn't exist).
    pub(crate) async fn execute(mut self, pool: &SqlitePool, id: &str) -> DbResult<u64> {
        self.builder
            .push("updated_at = ")
            .push_bind(Utc::now())
            .push(" WHERE id = ")
            .push_bind(id.to_string());

        let result = self.builder.build().execute(pool).await?;
        Ok(result.rows_affected())
    }

    #[cfg(test)]
    fn sql(&self) -> &str {
        self.builder.sql()
    }
}
