//! # Appointment Repository
//!
//! Bookings tie a customer to an employee for one or more services.
//!
//! ## Integrity
//! ```text
//! appointments.customer_id ──FK──► customers.id   (checked on write)
//! appointments.employee_id ──FK──► employees.id   (checked on write)
//! appointments.service_ids ──────► services.id    (JSON list, NOT checked)
//! ```
//!
//! Deleting a customer or employee that still has appointments fails with
//! [`DbError::ForeignKeyViolation`](crate::error::DbError::ForeignKeyViolation).
//! Nothing cascades.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::{count_rows, decode_list, delete_row, encode_list, UpdateStatement};
use salon_core::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment};

const TABLE: &str = "appointments";

#[derive(Debug, FromRow)]
struct AppointmentRow {
    id: String,
    customer_id: String,
    employee_id: String,
    service_ids: Option<String>,
    date: String,
    time: String,
    status: AppointmentStatus,
    total: f64,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AppointmentRow {
    fn into_appointment(self) -> DbResult<Appointment> {
        Ok(Appointment {
            id: self.id,
            customer_id: self.customer_id,
            employee_id: self.employee_id,
            service_ids: decode_list("service_ids", self.service_ids)?,
            date: self.date,
            time: self.time,
            status: self.status,
            total: self.total,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for appointment database operations.
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    pool: SqlitePool,
}

impl AppointmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AppointmentRepository { pool }
    }

    /// Lists every appointment in calendar order (date, then time).
    pub async fn get_all(&self) -> DbResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT
                id, customer_id, employee_id, service_ids,
                date, time, status, total, notes,
                created_at, updated_at
            FROM appointments
            ORDER BY date ASC, time ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded appointments");
        rows.into_iter().map(AppointmentRow::into_appointment).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Appointment>> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT
                id, customer_id, employee_id, service_ids,
                date, time, status, total, notes,
                created_at, updated_at
            FROM appointments
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AppointmentRow::into_appointment).transpose()
    }

    /// Books an appointment under the caller's id.
    ///
    /// ## Returns
    /// * `Ok(Appointment)` - The stored record
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown customer or employee
    pub async fn create(&self, input: NewAppointment) -> DbResult<Appointment> {
        let appointment = input.into_appointment(Utc::now());

        debug!(
            id = %appointment.id,
            customer_id = %appointment.customer_id,
            employee_id = %appointment.employee_id,
            "Creating appointment"
        );
        self.insert(&appointment).await?;

        Ok(appointment)
    }

    pub async fn insert(&self, appointment: &Appointment) -> DbResult<()> {
        let service_ids = encode_list("service_ids", &appointment.service_ids)?;

        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, customer_id, employee_id, service_ids,
                date, time, status, total, notes,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8, ?9,
                ?10, ?11
            )
            "#,
        )
        .bind(&appointment.id)
        .bind(&appointment.customer_id)
        .bind(&appointment.employee_id)
        .bind(service_ids)
        .bind(&appointment.date)
        .bind(&appointment.time)
        .bind(appointment.status)
        .bind(appointment.total)
        .bind(&appointment.notes)
        .bind(appointment.created_at)
        .bind(appointment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes the fields present in `patch` and refreshes `updated_at`.
    ///
    /// Any status may follow any other. A patch that re-points the booking
    /// at a missing customer or employee fails with a foreign key violation.
    pub async fn update(&self, id: &str, patch: AppointmentPatch) -> DbResult<()> {
        let mut stmt = UpdateStatement::new(TABLE);
        stmt.set("customer_id", patch.customer_id)
            .set("employee_id", patch.employee_id)
            .set("date", patch.date)
            .set("time", patch.time)
            .set("status", patch.status)
            .set("total", patch.total)
            .set("notes", patch.notes);
        stmt.set_json("service_ids", patch.service_ids.as_deref())?;

        let fields = stmt.assignments();
        let affected = stmt.execute(&self.pool, id).await?;

        debug!(id = %id, fields, affected, "Updated appointment");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let affected = delete_row(&self.pool, TABLE, id).await?;
        debug!(id = %id, affected, "Deleted appointment");
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
    use crate::pool::Database;
    use crate::test_support::{new_customer, new_employee, test_db, tick};
    use salon_core::{Customer, Employee};

    async fn booking_parties(db: &Database) -> (Customer, Employee) {
        let customer = db
            .customers()
            .create(new_customer("Asha", "9990001111"))
            .await
            .unwrap();
        let employee = db
            .employees()
            .create(new_employee("Ravi", "Barber"))
            .await
            .unwrap();
        (customer, employee)
    }

    fn booking(id: &str, customer_id: &str, employee_id: &str, date: &str, time: &str) -> NewAppointment {
        NewAppointment {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            employee_id: employee_id.to_string(),
            service_ids: vec!["svc-2".to_string(), "svc-1".to_string()],
            date: date.to_string(),
            time: time.to_string(),
            status: AppointmentStatus::Scheduled,
            total: 650.0,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_round_trips_service_ids_in_order() {
        let db = test_db().await;
        let (customer, employee) = booking_parties(&db).await;
        let repo = db.appointments();

        let created = repo
            .create(booking("apt-1", &customer.id, &employee.id, "2024-06-01", "10:00"))
            .await
            .unwrap();

        let found = repo.get_by_id("apt-1").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.service_ids, vec!["svc-2", "svc-1"]);
        assert_eq!(found.status, AppointmentStatus::Scheduled);
    }

    #[tokio::test]
    async fn test_unknown_customer_is_foreign_key_violation() {
        let db = test_db().await;
        let (_, employee) = booking_parties(&db).await;

        let err = db
            .appointments()
            .create(booking("apt-1", "cust-ghost", &employee.id, "2024-06-01", "10:00"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "{err:?}");
        assert_eq!(db.appointments().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_employee_is_foreign_key_violation() {
        let db = test_db().await;
        let (customer, _) = booking_parties(&db).await;

        let err = db
            .appointments()
            .create(booking("apt-1", &customer.id, "emp-ghost", "2024-06-01", "10:00"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_unknown_service_ids_are_accepted() {
        let db = test_db().await;
        let (customer, employee) = booking_parties(&db).await;

        let mut input = booking("apt-1", &customer.id, &employee.id, "2024-06-01", "10:00");
        input.service_ids = vec!["svc-does-not-exist".to_string()];

        db.appointments().create(input).await.unwrap();
    }

    #[tokio::test]
    async fn test_referenced_customer_and_employee_cannot_be_deleted() {
        let db = test_db().await;
        let (customer, employee) = booking_parties(&db).await;
        db.appointments()
            .create(booking("apt-1", &customer.id, &employee.id, "2024-06-01", "10:00"))
            .await
            .unwrap();

        let err = db.customers().delete(&customer.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "{err:?}");

        let err = db.employees().delete(&employee.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "{err:?}");

        assert!(db.customers().get_by_id(&customer.id).await.unwrap().is_some());
        assert!(db.appointments().get_by_id("apt-1").await.unwrap().is_some());

        // Once the booking is gone the customer can go too.
        db.appointments().delete("apt-1").await.unwrap();
        db.customers().delete(&customer.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_all_orders_by_date_then_time() {
        let db = test_db().await;
        let (c, e) = booking_parties(&db).await;
        let repo = db.appointments();

        repo.create(booking("apt-c", &c.id, &e.id, "2024-06-02", "09:00")).await.unwrap();
        repo.create(booking("apt-b", &c.id, &e.id, "2024-06-01", "15:30")).await.unwrap();
        repo.create(booking("apt-a", &c.id, &e.id, "2024-06-01", "10:00")).await.unwrap();

        let ids: Vec<String> = repo.get_all().await.unwrap().into_iter().map(|a| a.id).collect();

        assert_eq!(ids, vec!["apt-a", "apt-b", "apt-c"]);
    }

    #[tokio::test]
    async fn test_status_transitions_are_unrestricted() {
        let db = test_db().await;
        let (c, e) = booking_parties(&db).await;
        let repo = db.appointments();
        let before = repo
            .create(booking("apt-1", &c.id, &e.id, "2024-06-01", "10:00"))
            .await
            .unwrap();

        tick().await;
        for status in [
            AppointmentStatus::Cancelled,
            AppointmentStatus::Scheduled,
            AppointmentStatus::Completed,
        ] {
            repo.update(
                "apt-1",
                AppointmentPatch {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

            assert_eq!(repo.get_by_id("apt-1").await.unwrap().unwrap().status, status);
        }

        let after = repo.get_by_id("apt-1").await.unwrap().unwrap();
        assert_eq!(after.service_ids, before.service_ids);
        assert_eq!(after.total, before.total);
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_update_to_unknown_employee_fails() {
        let db = test_db().await;
        let (c, e) = booking_parties(&db).await;
        let repo = db.appointments();
        repo.create(booking("apt-1", &c.id, &e.id, "2024-06-01", "10:00"))
            .await
            .unwrap();

        let err = repo
            .update(
                "apt-1",
                AppointmentPatch {
                    employee_id: Some("emp-ghost".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "{err:?}");
        assert_eq!(
            repo.get_by_id("apt-1").await.unwrap().unwrap().employee_id,
            e.id
        );
    }

    #[tokio::test]
    async fn test_status_check_constraint() {
        let db = test_db().await;
        let (c, e) = booking_parties(&db).await;

        let err: DbError = sqlx::query(
            "INSERT INTO appointments (id, customer_id, employee_id, service_ids, date, time, status, total)
             VALUES ('apt-x', ?1, ?2, '[]', '2024-06-01', '10:00', 'noshow', 0)",
        )
        .bind(&c.id)
        .bind(&e.id)
        .execute(db.pool())
        .await
        .unwrap_err()
        .into();

        assert!(matches!(err, DbError::CheckViolation { .. }), "{err:?}");
    }
}
