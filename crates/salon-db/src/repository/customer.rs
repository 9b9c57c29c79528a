//! # Customer Repository
//!
//! Database operations for customers.
//!
//! ## Column Mapping
//! ```text
//! Customer.preferred_services  Vec<String>  ⇄  preferred_services TEXT (JSON)
//! Customer.gender              Gender       ⇄  gender TEXT CHECK (male|female)
//! Customer.phone               String       ⇄  phone TEXT UNIQUE
//! ```

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::{
    count_rows, decode_list, delete_row, encode_list, generate_id, UpdateStatement,
};
use salon_core::{Customer, CustomerPatch, Gender, NewCustomer, CUSTOMER_ID_PREFIX};

const TABLE: &str = "customers";

#[derive(Debug, FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    phone: String,
    email: Option<String>,
    gender: Gender,
    visit_count: i64,
    total_spent: f64,
    last_visit: Option<String>,
    preferred_services: Option<String>,
    notes: Option<String>,
    photo: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self) -> DbResult<Customer> {
        Ok(Customer {
            id: self.id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            gender: self.gender,
            visit_count: self.visit_count,
            total_spent: self.total_spent,
            last_visit: self.last_visit,
            preferred_services: decode_list("preferred_services", self.preferred_services)?,
            notes: self.notes,
            photo: self.photo,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for customer database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.customers();
///
/// let asha = repo.create(new_customer).await?;
/// let found = repo.get_by_id(&asha.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists every customer, ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT
                id, name, phone, email, gender,
                visit_count, total_spent, last_visit,
                preferred_services, notes, photo,
                created_at, updated_at
            FROM customers
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded customers");
        rows.into_iter().map(CustomerRow::into_customer).collect()
    }

    /// Gets a customer by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Customer))` - Customer found
    /// * `Ok(None)` - No customer with that id
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT
                id, name, phone, email, gender,
                visit_count, total_spent, last_visit,
                preferred_services, notes, photo,
                created_at, updated_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CustomerRow::into_customer).transpose()
    }

    /// Creates a customer with a generated `cust-` id, zero visits and zero
    /// spend.
    ///
    /// ## Returns
    /// * `Ok(Customer)` - The stored record
    /// * `Err(DbError::UniqueViolation)` - Phone number already on file
    pub async fn create(&self, input: NewCustomer) -> DbResult<Customer> {
        let customer = input.into_customer(generate_id(CUSTOMER_ID_PREFIX), Utc::now());

        debug!(id = %customer.id, "Creating customer");
        self.insert(&customer).await?;

        Ok(customer)
    }

    /// Inserts a fully materialized customer as-is.
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        let preferred_services = encode_list("preferred_services", &customer.preferred_services)?;

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, phone, email, gender,
                visit_count, total_spent, last_visit,
                preferred_services, notes, photo,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8,
                ?9, ?10, ?11,
                ?12, ?13
            )
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(customer.gender)
        .bind(customer.visit_count)
        .bind(customer.total_spent)
        .bind(&customer.last_visit)
        .bind(preferred_services)
        .bind(&customer.notes)
        .bind(&customer.photo)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes the fields present in `patch` and refreshes `updated_at`.
    ///
    /// Succeeds even when no customer has this id.
    pub async fn update(&self, id: &str, patch: CustomerPatch) -> DbResult<()> {
        let mut stmt = UpdateStatement::new(TABLE);
        stmt.set("name", patch.name)
            .set("phone", patch.phone)
            .set("email", patch.email)
            .set("gender", patch.gender)
            .set("visit_count", patch.visit_count)
            .set("total_spent", patch.total_spent)
            .set("last_visit", patch.last_visit)
            .set("notes", patch.notes)
            .set("photo", patch.photo);
        stmt.set_json("preferred_services", patch.preferred_services.as_deref())?;

        let fields = stmt.assignments();
        let affected = stmt.execute(&self.pool, id).await?;

        debug!(id = %id, fields, affected, "Updated customer");
        Ok(())
    }

    /// Hard-deletes a customer. No-op when absent.
    ///
    /// Fails with `DbError::ForeignKeyViolation` while an appointment still
    /// references the customer.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let affected = delete_row(&self.pool, TABLE, id).await?;
        debug!(id = %id, affected, "Deleted customer");
        Ok(())
    }

    /// Counts customers. The seed loader's emptiness check.
    pub async fn count(&self) -> DbResult<i64> {
        count_rows(&self.pool, TABLE).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
