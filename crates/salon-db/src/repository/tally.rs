//! # Tally Repository
//!
//! Point-of-sale records.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A tally item copies who/what at the moment of sale:                    │
//! │                                                                         │
//! │    customer_name, customer_phone, staff_name   plain TEXT, no FKs       │
//! │    services  [{name, price}, ...]               JSON TEXT                │
//! │                                                                         │
//! │  Renaming a service or deleting an employee later never rewrites the   │
//! │  history kept here.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Payment Flow
//! ```text
//! create()                    → payment_status as given, payment_date = now
//! update_payment_status(...)  → status (+ UPI transaction id), payment_date kept
//! ```

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::{
    count_rows, decode_list, delete_row, encode_list, generate_id, UpdateStatement,
};
use salon_core::{
    NewTallyItem, PaymentMethod, PaymentStatus, TallyItem, TallyPatch, TALLY_ID_PREFIX,
};

const TABLE: &str = "tally_items";

#[derive(Debug, FromRow)]
struct TallyRow {
    id: String,
    date: String,
    time: String,
    customer_name: String,
    customer_phone: String,
    staff_name: String,
    services: Option<String>,
    total_cost: f64,
    payment_method: PaymentMethod,
    payment_status: PaymentStatus,
    payment_date: Option<DateTime<Utc>>,
    upi_transaction_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TallyRow {
    fn into_tally_item(self) -> DbResult<TallyItem> {
        Ok(TallyItem {
            id: self.id,
            date: self.date,
            time: self.time,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            staff_name: self.staff_name,
            services: decode_list("services", self.services)?,
            total_cost: self.total_cost,
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            payment_date: self.payment_date,
            upi_transaction_id: self.upi_transaction_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for tally (sale) records.
///
/// ## Usage
/// ```rust,ignore
/// let tally = db.tally();
///
/// let item = tally.create(new_item).await?;
/// tally
///     .update_payment_status(&item.id, PaymentStatus::Completed, Some("TXN123"))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct TallyRepository {
    pool: SqlitePool,
}

impl TallyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TallyRepository { pool }
    }

    /// Lists every tally item, most recent first (date, then time, descending).
    pub async fn get_all(&self) -> DbResult<Vec<TallyItem>> {
        let rows = sqlx::query_as::<_, TallyRow>(
            r#"
            SELECT
                id, date, time, customer_name, customer_phone, staff_name,
                services, total_cost, payment_method, payment_status,
                payment_date, upi_transaction_id,
                created_at, updated_at
            FROM tally_items
            ORDER BY date DESC, time DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded tally items");
        rows.into_iter().map(TallyRow::into_tally_item).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<TallyItem>> {
        let row = sqlx::query_as::<_, TallyRow>(
            r#"
            SELECT
                id, date, time, customer_name, customer_phone, staff_name,
                services, total_cost, payment_method, payment_status,
                payment_date, upi_transaction_id,
                created_at, updated_at
            FROM tally_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TallyRow::into_tally_item).transpose()
    }

    /// Records a sale under a generated `tally-` id.
    ///
    /// `payment_date` is stamped now; `payment_status` is stored as given.
    pub async fn create(&self, input: NewTallyItem) -> DbResult<TallyItem> {
        let item = input.into_tally_item(generate_id(TALLY_ID_PREFIX), Utc::now());

        debug!(
            id = %item.id,
            method = %item.payment_method,
            status = %item.payment_status,
            total = item.total_cost,
            "Recording tally item"
        );
        self.insert(&item).await?;

        Ok(item)
    }

    pub async fn insert(&self, item: &TallyItem) -> DbResult<()> {
        let services = encode_list("services", &item.services)?;

        sqlx::query(
            r#"
            INSERT INTO tally_items (
                id, date, time, customer_name, customer_phone, staff_name,
                services, total_cost, payment_method, payment_status,
                payment_date, upi_transaction_id,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12,
                ?13, ?14
            )
            "#,
        )
        .bind(&item.id)
        .bind(&item.date)
        .bind(&item.time)
        .bind(&item.customer_name)
        .bind(&item.customer_phone)
        .bind(&item.staff_name)
        .bind(services)
        .bind(item.total_cost)
        .bind(item.payment_method)
        .bind(item.payment_status)
        .bind(item.payment_date)
        .bind(&item.upi_transaction_id)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes the fields present in `patch` and refreshes `updated_at`.
    pub async fn update(&self, id: &str, patch: TallyPatch) -> DbResult<()> {
        let mut stmt = UpdateStatement::new(TABLE);
        stmt.set("date", patch.date)
            .set("time", patch.time)
            .set("customer_name", patch.customer_name)
            .set("customer_phone", patch.customer_phone)
            .set("staff_name", patch.staff_name)
            .set("total_cost", patch.total_cost)
            .set("payment_method", patch.payment_method)
            .set("payment_status", patch.payment_status)
            .set("upi_transaction_id", patch.upi_transaction_id);
        stmt.set_json("services", patch.services.as_deref())?;

        let fields = stmt.assignments();
        let affected = stmt.execute(&self.pool, id).await?;

        debug!(id = %id, fields, affected, "Updated tally item");
        Ok(())
    }

    /// Records a payment outcome.
    ///
    /// The UPI transaction id is written only when given; an existing one is
    /// kept otherwise. `payment_date` keeps its creation stamp.
    pub async fn update_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
        upi_transaction_id: Option<&str>,
    ) -> DbResult<()> {
        let mut stmt = UpdateStatement::new(TABLE);
        stmt.set("payment_status", Some(status))
            .set("upi_transaction_id", upi_transaction_id.map(str::to_string));

        let affected = stmt.execute(&self.pool, id).await?;

        debug!(id = %id, %status, affected, "Updated payment status");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let affected = delete_row(&self.pool, TABLE, id).await?;
        debug!(id = %id, affected, "Deleted tally item");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        count_rows(&self.pool, TABLE).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::test_support::{new_tally_item, test_db, tick};
    use salon_core::TallyService;

    #[tokio::test]
    async fn test_create_stamps_payment_date() {
        let db = test_db().await;
        let repo = db.tally();

        let before = Utc::now();
        let item = repo
            .create(new_tally_item("2024-06-01", "10:00", PaymentMethod::Cash))
            .await
            .unwrap();

        assert!(item.id.starts_with("tally-"));
        assert_eq!(item.payment_status, PaymentStatus::Pending);
        assert!(item.upi_transaction_id.is_none());
        let stamped = item.payment_date.unwrap();
        assert!(stamped >= before);

        let found = repo.get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(found, item);
    }

    #[tokio::test]
    async fn test_payment_status_stored_as_given() {
        let db = test_db().await;

        let mut input = new_tally_item("2024-06-01", "10:00", PaymentMethod::Card);
        input.payment_status = PaymentStatus::Completed;
        let item = db.tally().create(input).await.unwrap();

        assert_eq!(
            db.tally().get_by_id(&item.id).await.unwrap().unwrap().payment_status,
            PaymentStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_upi_payment_confirmation() {
        let db = test_db().await;
        let repo = db.tally();

        let mut input = new_tally_item("2024-06-01", "10:00", PaymentMethod::Upi);
        input.payment_status = PaymentStatus::Pending;
        let created = repo.create(input).await.unwrap();

        tick().await;
        repo.update_payment_status(&created.id, PaymentStatus::Completed, Some("TXN123"))
            .await
            .unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 1);

        let item = &all[0];
        assert_eq!(item.payment_status, PaymentStatus::Completed);
        assert_eq!(item.upi_transaction_id.as_deref(), Some("TXN123"));
        assert_eq!(item.payment_date, created.payment_date);
        assert!(item.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_payment_status_without_upi_keeps_existing_id() {
        let db = test_db().await;
        let repo = db.tally();
        let created = repo
            .create(new_tally_item("2024-06-01", "10:00", PaymentMethod::Upi))
            .await
            .unwrap();

        repo.update_payment_status(&created.id, PaymentStatus::Completed, Some("TXN123"))
            .await
            .unwrap();
        repo.update_payment_status(&created.id, PaymentStatus::Cancelled, None)
            .await
            .unwrap();

        let item = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(item.payment_status, PaymentStatus::Cancelled);
        assert_eq!(item.upi_transaction_id.as_deref(), Some("TXN123"));
    }

    #[tokio::test]
    async fn test_patch_can_clear_upi_transaction_id() {
        let db = test_db().await;
        let repo = db.tally();
        let created = repo
            .create(new_tally_item("2024-06-01", "10:00", PaymentMethod::Upi))
            .await
            .unwrap();
        repo.update_payment_status(&created.id, PaymentStatus::Failed, Some("TXN999"))
            .await
            .unwrap();

        repo.update(
            &created.id,
            TallyPatch {
                upi_transaction_id: Some(None),
                payment_status: Some(PaymentStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let item = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert!(item.upi_transaction_id.is_none());
        assert_eq!(item.payment_status, PaymentStatus::Pending);
        assert_eq!(item.payment_date, created.payment_date);
    }

    #[tokio::test]
    async fn test_get_all_most_recent_first() {
        let db = test_db().await;
        let repo = db.tally();

        let a = repo.create(new_tally_item("2024-06-01", "09:00", PaymentMethod::Cash)).await.unwrap();
        let b = repo.create(new_tally_item("2024-06-02", "08:00", PaymentMethod::Cash)).await.unwrap();
        let c = repo.create(new_tally_item("2024-06-01", "17:45", PaymentMethod::Card)).await.unwrap();

        let ids: Vec<String> = repo.get_all().await.unwrap().into_iter().map(|t| t.id).collect();

        assert_eq!(ids, vec![b.id, c.id, a.id]);
    }

    #[tokio::test]
    async fn test_services_snapshot_round_trips() {
        let db = test_db().await;
        let repo = db.tally();

        let mut input = new_tally_item("2024-06-01", "10:00", PaymentMethod::Cash);
        input.services = vec![
            TallyService {
                name: "Haircut".to_string(),
                price: 300.0,
            },
            TallyService {
                name: "Beard Trim".to_string(),
                price: 150.0,
            },
        ];
        input.total_cost = 450.0;
        let created = repo.create(input).await.unwrap();

        let found = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.services, created.services);
        assert_eq!(found.services_total(), 450.0);
    }

    #[tokio::test]
    async fn test_partial_update_and_delete() {
        let db = test_db().await;
        let repo = db.tally();
        let before = repo
            .create(new_tally_item("2024-06-01", "10:00", PaymentMethod::Cash))
            .await
            .unwrap();

        tick().await;
        repo.update(
            &before.id,
            TallyPatch {
                staff_name: Some("Sita".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let after = repo.get_by_id(&before.id).await.unwrap().unwrap();
        assert_eq!(after.staff_name, "Sita");
        assert_eq!(
            TallyItem {
                staff_name: before.staff_name.clone(),
                updated_at: before.updated_at,
                ..after.clone()
            },
            before
        );
        assert!(after.updated_at > before.updated_at);

        repo.delete(&before.id).await.unwrap();
        assert!(repo.get_by_id(&before.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_payment_method_check_constraint() {
        let db = test_db().await;

        let err: DbError = sqlx::query(
            "INSERT INTO tally_items
                (id, date, time, customer_name, customer_phone, staff_name, services, total_cost, payment_method)
             VALUES ('tally-x', '2024-06-01', '10:00', 'A', '1', 'B', '[]', 0, 'cheque')",
        )
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();

        assert!(matches!(err, DbError::CheckViolation { .. }), "{err:?}");
    }
}
