//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Categorized by constraint kind,               │
//! │       │                   store message kept verbatim                   │
//! │       ▼                                                                 │
//! │  Caller decides what to show                                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The layer validates nothing itself. Every constraint failure below comes
//! straight from SQLite.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Creating a customer with a phone number already on file
    /// - Re-using a caller-supplied id (services, appointments, products)
    #[error("Unique constraint violated: {message}")]
    UniqueViolation { message: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Appointment referencing a non-existent customer or employee
    /// - Deleting a customer or employee an appointment still points at
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (gender, appointment status, payment enums).
    #[error("Check constraint violated: {message}")]
    CheckViolation { message: String },

    /// NOT NULL constraint violation.
    #[error("Not null constraint violated: {message}")]
    NotNullViolation { message: String },

    /// A JSON list column could not be encoded or decoded.
    ///
    /// ## When This Occurs
    /// - Row edited by hand with invalid JSON in `preferred_services` etc.
    #[error("Malformed JSON in column {column}: {source}")]
    MalformedJson {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Seed data could not be loaded from its source.
    #[error("Seed source failed: {0}")]
    SeedSource(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema creation failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Any other statement failure reported by SQLite.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The single connection is busy and the acquire timeout elapsed.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal error (driver errors, panicked background tasks).
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub(crate) fn json(column: &'static str, source: serde_json::Error) -> Self {
        DbError::MalformedJson { column, source }
    }

    /// True for any of the four store-level constraint failures.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::UniqueViolation { .. }
                | DbError::ForeignKeyViolation { .. }
                | DbError::CheckViolation { .. }
                | DbError::NotNullViolation { .. }
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database      → by ErrorKind (unique / fk / check / not null)
/// sqlx::Error::PoolTimedOut  → DbError::PoolExhausted
/// sqlx::Error::PoolClosed    → DbError::ConnectionFailed
/// Other                      → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation { message },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    ErrorKind::CheckViolation => DbError::CheckViolation { message },
                    ErrorKind::NotNullViolation => DbError::NotNullViolation { message },
                    _ => DbError::QueryFailed(message),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_classification() {
        assert!(DbError::UniqueViolation {
            message: "UNIQUE constraint failed: customers.phone".to_string()
        }
        .is_constraint_violation());
        assert!(!DbError::PoolExhausted.is_constraint_violation());
    }

    #[test]
    fn test_malformed_json_names_column() {
        let source = serde_json::from_str::<Vec<String>>("[oops").unwrap_err();
        let err = DbError::json("preferred_services", source);
        assert!(err.to_string().starts_with("Malformed JSON in column preferred_services"));
    }
}
